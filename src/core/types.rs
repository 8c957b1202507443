//! Core types for uploads, conversion requests and their results.

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::utils::{ConversionError, TargetFormat, ValidationError, validate_quality};

/// Quality used when the caller does not pick one
pub const DEFAULT_QUALITY: u8 = 95;

/// Name of the archive offered for download
pub const DEFAULT_ARCHIVE_NAME: &str = "converted_images.zip";

/// MIME type of the archive offered for download
pub const ARCHIVE_MIME: &str = "application/zip";

/// One file selected by the user.
///
/// The bytes are shared, never mutated, and live as long as the session
/// keeps the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedItem {
    /// Client-declared file name, extension included
    pub name: String,
    /// Raw file contents
    pub bytes: Arc<[u8]>,
}

impl UploadedItem {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Target format and quality for one conversion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    /// Output format for every item in the batch
    pub target_format: TargetFormat,
    /// Quality level (1-100), ignored for formats without a lossy mode
    pub quality: u8,
}

impl ConversionRequest {
    /// Creates a request, rejecting quality outside 1-100.
    pub fn new(target_format: TargetFormat, quality: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            target_format,
            quality: validate_quality(quality)?,
        })
    }

    /// Re-checks a request that arrived through deserialization
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_quality(u32::from(self.quality)).map(|_| ())
    }

    /// Quality actually handed to the encoder, `None` when the format ignores it
    pub fn effective_quality(&self) -> Option<u8> {
        self.target_format
            .supports_quality()
            .then_some(self.quality)
    }
}

impl Default for ConversionRequest {
    fn default() -> Self {
        Self {
            target_format: TargetFormat::default(),
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Result of converting a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Converted {
        output_name: String,
        output_bytes: Vec<u8>,
    },
    Failed {
        item_name: String,
        error: ConversionError,
    },
}

/// A failed item as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemError {
    pub item_name: String,
    pub message: String,
}

/// The ZIP archive built by the most recent conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveArtifact {
    /// File name offered for download
    pub file_name: String,
    /// Finished ZIP container
    pub bytes: Arc<[u8]>,
    /// Entry names, in archive order
    pub entries: Vec<String>,
}

impl ArchiveArtifact {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything one pipeline run produced. Archive and errors always come from
/// the same batch.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub artifact: ArchiveArtifact,
    pub errors: Vec<ItemError>,
}

impl ConversionReport {
    /// `(item_name, message)` pairs in upload order
    pub fn error_pairs(&self) -> Vec<(&str, &str)> {
        self.errors
            .iter()
            .map(|e| (e.item_name.as_str(), e.message.as_str()))
            .collect()
    }
}

/// Returned to the shell after a convert action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    /// Entry names written to the archive
    pub entries: Vec<String>,
    /// Per-item failures, in upload order
    pub errors: Vec<ItemError>,
    /// Archive size in bytes
    pub archive_size: usize,
}

impl From<&ConversionReport> for ConvertResponse {
    fn from(report: &ConversionReport) -> Self {
        Self {
            entries: report.artifact.entries.clone(),
            errors: report.errors.clone(),
            archive_size: report.artifact.size(),
        }
    }
}

/// Archive bytes ready for a download button.
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Arc<[u8]>,
}

/// What the shell needs to re-render after any action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub item_names: Vec<String>,
    pub has_archive: bool,
    pub archive_entries: Vec<String>,
}
