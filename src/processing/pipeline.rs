use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::{
    ArchiveArtifact, BatchProgress, ConversionOutcome, ConversionReport, ConversionRequest,
    DEFAULT_ARCHIVE_NAME, ItemError, SessionState, UploadedItem,
};
use crate::processing::{ArchiveBuilder, Codec, ImageCodec};
use crate::utils::{ConverterResult, output_name};

/// Converts a batch of uploads and packages the results.
///
/// Items are processed one after another in upload order. A failing item is
/// recorded and skipped; nothing short of the archive writer failing stops a run.
#[derive(Clone)]
pub struct ConversionPipeline {
    codec: Arc<dyn Codec>,
    archive_name: String,
}

impl Default for ConversionPipeline {
    fn default() -> Self {
        Self::new(Arc::new(ImageCodec))
    }
}

impl ConversionPipeline {
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        Self {
            codec,
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
        }
    }

    /// Overrides the download file name of produced archives
    pub fn with_archive_name(mut self, name: impl Into<String>) -> Self {
        self.archive_name = name.into();
        self
    }

    /// Converts a single item without touching any archive
    pub fn convert_item(&self, item: &UploadedItem, request: &ConversionRequest) -> ConversionOutcome {
        match self.codec.convert(&item.bytes, request.target_format, request.quality) {
            Ok(output_bytes) => ConversionOutcome::Converted {
                output_name: output_name(&item.name, request.target_format),
                output_bytes,
            },
            Err(error) => ConversionOutcome::Failed {
                item_name: item.name.clone(),
                error,
            },
        }
    }

    /// Runs the batch and returns the archive together with per-item errors.
    pub fn run(&self, items: &[UploadedItem], request: &ConversionRequest) -> ConverterResult<ConversionReport> {
        self.run_with_progress(items, request, |_| {})
    }

    /// Like [`run`](Self::run), calling `progress` after every item.
    pub fn run_with_progress(
        &self,
        items: &[UploadedItem],
        request: &ConversionRequest,
        mut progress: impl FnMut(BatchProgress),
    ) -> ConverterResult<ConversionReport> {
        let total = items.len();
        info!(
            "Converting {} images to {} (quality {})",
            total,
            request.target_format,
            request
                .effective_quality()
                .map_or_else(|| "n/a".to_string(), |q| q.to_string())
        );

        let mut builder = ArchiveBuilder::new();
        let mut names = OutputNames::default();
        let mut errors = Vec::new();

        for (idx, item) in items.iter().enumerate() {
            match self.convert_item(item, request) {
                ConversionOutcome::Converted { output_name, output_bytes } => {
                    let entry_name = names.claim(&output_name);
                    debug!("{} -> {} ({} bytes)", item.name, entry_name, output_bytes.len());
                    builder.add_entry(entry_name, output_bytes);
                }
                ConversionOutcome::Failed { item_name, error } => {
                    warn!("Conversion failed for {}: {}", item_name, error);
                    errors.push(ItemError {
                        item_name,
                        message: error.to_string(),
                    });
                }
            }

            progress(BatchProgress::new(idx + 1, total, &item.name, errors.len()));
        }

        let artifact = ArchiveArtifact {
            file_name: self.archive_name.clone(),
            entries: builder.names(),
            bytes: builder.finalize()?.into(),
        };

        if errors.is_empty() {
            info!("Batch converted successfully: {} files", artifact.entries.len());
        } else {
            warn!(
                "Batch completed with {} failed files out of {}",
                errors.len(),
                total
            );
        }

        Ok(ConversionReport { artifact, errors })
    }

    /// Runs the batch over the session's current items and publishes the archive.
    ///
    /// On error the session keeps its previous archive.
    pub fn run_into(&self, state: &mut SessionState, request: &ConversionRequest) -> ConverterResult<ConversionReport> {
        let report = self.run(state.items(), request)?;
        state.set_artifact(report.artifact.clone());
        Ok(report)
    }
}

/// Hands out unique archive entry names for one run.
///
/// The first `photo.png` keeps its name, later ones become `photo (2).png`,
/// `photo (3).png` and so on.
#[derive(Debug, Default)]
struct OutputNames {
    taken: HashMap<String, usize>,
}

impl OutputNames {
    fn claim(&mut self, name: &str) -> String {
        let mut candidate = name.to_string();
        let mut counter = self.taken.get(name).copied().unwrap_or(0);

        while self.taken.contains_key(&candidate) {
            counter += 1;
            candidate = with_suffix(name, counter + 1);
        }

        self.taken.insert(name.to_string(), counter);
        self.taken.entry(candidate.clone()).or_insert(0);
        candidate
    }
}

fn with_suffix(name: &str, n: usize) -> String {
    match name.rfind('.') {
        Some(idx) if idx > 0 => format!("{} ({}){}", &name[..idx], n, &name[idx..]),
        _ => format!("{name} ({n})"),
    }
}
