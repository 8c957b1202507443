//! In-memory ZIP archive builder.

use std::io::{Cursor, Write};

use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::utils::ConverterResult;

/// Collects named blobs and writes them out as one DEFLATE-compressed ZIP.
///
/// Entries are held until [`finalize`](Self::finalize), which rebuilds the
/// container from scratch on every call. Every entry is stamped with the same
/// fixed modification time, so finalizing twice yields identical bytes.
#[derive(Debug, Default, Clone)]
pub struct ArchiveBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one entry at the end of the archive.
    ///
    /// An entry that already uses `name` is removed first, so the later blob
    /// wins. Returns `true` when that happened.
    pub fn add_entry(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> bool {
        let name = name.into();
        let replaced = match self.entries.iter().position(|(existing, _)| *existing == name) {
            Some(idx) => {
                warn!("Archive entry '{}' added twice, keeping the later one", name);
                self.entries.remove(idx);
                true
            }
            None => false,
        };
        self.entries.push((name, bytes));
        replaced
    }

    /// Entry names in archive order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Writes every entry into a fresh ZIP container and returns its bytes.
    pub fn finalize(&self) -> ConverterResult<Vec<u8>> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in &self.entries {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(bytes)?;
        }
        let bytes = writer.finish()?.into_inner();

        debug!("Archive finalized: {} entries, {} bytes", self.entries.len(), bytes.len());
        Ok(bytes)
    }
}
