//! Request/response handler for the actions of one session.

use tracing::{debug, info};

use crate::core::{
    ARCHIVE_MIME, ConversionRequest, ConvertResponse, ConverterConfig, Download, SessionSnapshot,
    SessionState, UploadedItem,
};
use crate::processing::ConversionPipeline;
use crate::utils::{ConverterResult, ValidationError, validate_uploads};

/// Owns the state of one session and runs its actions to completion, one at a time.
pub struct SessionHandler {
    config: ConverterConfig,
    pipeline: ConversionPipeline,
    state: SessionState,
}

impl SessionHandler {
    pub fn new(config: ConverterConfig) -> Self {
        let pipeline = ConversionPipeline::default().with_archive_name(config.archive_name.clone());
        Self::with_pipeline(config, pipeline)
    }

    /// Uses a custom pipeline, e.g. one with a different codec
    pub fn with_pipeline(config: ConverterConfig, pipeline: ConversionPipeline) -> Self {
        Self {
            config,
            pipeline,
            state: SessionState::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Replaces the current uploads.
    ///
    /// The whole selection is rejected, and the state left untouched, if any
    /// file carries an extension outside the accepted list.
    pub fn upload(&mut self, items: Vec<UploadedItem>) -> ConverterResult<SessionSnapshot> {
        validate_uploads(&items, &self.config.accepted_extensions)?;
        debug!("Upload of {} files accepted", items.len());
        self.state.set_items(items);
        Ok(self.state.snapshot())
    }

    /// Converts the current uploads and publishes the resulting archive.
    pub fn convert(&mut self, request: ConversionRequest) -> ConverterResult<ConvertResponse> {
        request.validate()?;
        if self.state.items().is_empty() {
            return Err(ValidationError::NothingToConvert.into());
        }

        let report = self.pipeline.run_into(&mut self.state, &request)?;
        Ok(ConvertResponse::from(&report))
    }

    /// The archive from the last run, if any
    pub fn download(&self) -> Option<Download> {
        self.state.artifact().map(|artifact| Download {
            file_name: artifact.file_name.clone(),
            mime: ARCHIVE_MIME,
            bytes: artifact.bytes.clone(),
        })
    }

    /// Forgets the uploads and the archive in one step.
    pub fn clear(&mut self) -> SessionSnapshot {
        self.state.clear();
        info!("Session cleared");
        self.state.snapshot()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::codec::fixtures;
    use crate::utils::{ConverterError, TargetFormat};
    use image::ImageFormat;

    fn handler() -> SessionHandler {
        SessionHandler::new(ConverterConfig::default())
    }

    fn png(name: &str) -> UploadedItem {
        UploadedItem::new(name, fixtures::encoded(&fixtures::rgb(10, 10), ImageFormat::Png))
    }

    #[test]
    fn rejected_upload_keeps_previous_items() {
        let mut session = handler();
        session.upload(vec![png("keep.png")]).unwrap();

        let err = session
            .upload(vec![png("new.png"), UploadedItem::new("notes.txt", b"hi".to_vec())])
            .unwrap_err();

        assert!(matches!(
            err,
            ConverterError::Validation(ValidationError::UnsupportedExtension { .. })
        ));
        assert_eq!(session.snapshot().item_names, vec!["keep.png"]);
    }

    #[test]
    fn convert_without_uploads_is_rejected() {
        let mut session = handler();
        let err = session.convert(ConversionRequest::default()).unwrap_err();
        assert!(matches!(
            err,
            ConverterError::Validation(ValidationError::NothingToConvert)
        ));
        assert!(session.download().is_none());
    }

    #[test]
    fn convert_with_bad_quality_is_rejected() {
        let mut session = handler();
        session.upload(vec![png("a.png")]).unwrap();
        let request = ConversionRequest {
            target_format: TargetFormat::JPEG,
            quality: 0,
        };
        assert!(matches!(
            session.convert(request),
            Err(ConverterError::Validation(ValidationError::Quality(0)))
        ));
    }

    #[test]
    fn convert_then_download() {
        let mut session = handler();
        session.upload(vec![png("a.png"), png("b.png")]).unwrap();

        let response = session
            .convert(ConversionRequest::new(TargetFormat::WEBP, 50).unwrap())
            .unwrap();

        assert_eq!(response.entries, vec!["a.webp", "b.webp"]);
        assert!(response.errors.is_empty());

        let download = session.download().unwrap();
        assert_eq!(download.file_name, "converted_images.zip");
        assert_eq!(download.mime, "application/zip");
        assert_eq!(download.bytes.len(), response.archive_size);
    }

    #[test]
    fn new_upload_keeps_archive_until_next_convert() {
        let mut session = handler();
        session.upload(vec![png("a.png")]).unwrap();
        session.convert(ConversionRequest::default()).unwrap();

        let snapshot = session.upload(vec![png("z.png")]).unwrap();
        assert_eq!(snapshot.item_names, vec!["z.png"]);
        assert_eq!(snapshot.archive_entries, vec!["a.png"]);

        session.convert(ConversionRequest::default()).unwrap();
        assert_eq!(session.snapshot().archive_entries, vec!["z.png"]);
    }

    #[test]
    fn clear_drops_items_and_archive() {
        let mut session = handler();
        session.upload(vec![png("a.png")]).unwrap();
        session.convert(ConversionRequest::default()).unwrap();

        let snapshot = session.clear();

        assert!(snapshot.item_names.is_empty());
        assert!(!snapshot.has_archive);
        assert!(session.download().is_none());
    }

    #[test]
    fn archive_name_comes_from_config() {
        let config = ConverterConfig {
            archive_name: "batch.zip".into(),
            ..ConverterConfig::default()
        };
        let mut session = SessionHandler::new(config);
        session.upload(vec![png("a.png")]).unwrap();
        session.convert(ConversionRequest::default()).unwrap();
        assert_eq!(session.download().unwrap().file_name, "batch.zip");
    }
}
