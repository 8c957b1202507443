//! Async command handlers a host shell forwards user actions to.

use tracing::debug;

use crate::core::{AppState, ConversionRequest, ConvertResponse, Download, SessionId, SessionSnapshot, UploadedItem};
use crate::utils::ConverterResult;

/// Replaces the uploads of `session`.
///
/// # Arguments
/// * `state` - Application state holding every live session
/// * `session` - Session the upload belongs to
/// * `items` - Newly selected files
///
/// # Returns
/// The session snapshot after the upload.
pub async fn upload_images(
    state: &AppState,
    session: &SessionId,
    items: Vec<UploadedItem>,
) -> ConverterResult<SessionSnapshot> {
    debug!("Received upload_images command for {} files ({})", items.len(), session);
    let handler = state.session(session).await;
    let mut handler = handler.lock().await;
    handler.upload(items)
}

/// Converts every upload of `session` and stores the archive.
///
/// The session stays locked for the whole run, so a second action against
/// the same session waits for this one to finish. Decoding and encoding run
/// on tokio's blocking pool.
///
/// # Returns
/// Entry names, per-item errors and the archive size.
pub async fn convert_images(
    state: &AppState,
    session: &SessionId,
    request: ConversionRequest,
) -> ConverterResult<ConvertResponse> {
    debug!(
        "Received convert_images command: {} @ {} ({})",
        request.target_format, request.quality, session
    );
    let handler = state.session(session).await.lock_owned().await;

    tokio::task::spawn_blocking(move || {
        let mut handler = handler;
        handler.convert(request)
    })
    .await?
}

/// The archive built by the last conversion, if any.
pub async fn download_archive(state: &AppState, session: &SessionId) -> Option<Download> {
    state.session(session).await.lock().await.download()
}

/// Drops the uploads and the archive of `session` in one step.
pub async fn clear_session(state: &AppState, session: &SessionId) -> SessionSnapshot {
    state.session(session).await.lock().await.clear()
}

/// Current state of `session`, for re-rendering.
pub async fn session_snapshot(state: &AppState, session: &SessionId) -> SessionSnapshot {
    state.session(session).await.lock().await.snapshot()
}

/// Ends `session`, discarding everything it holds.
pub async fn end_session(state: &AppState, session: &SessionId) -> bool {
    state.end_session(session).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConverterConfig;
    use crate::processing::codec::fixtures;
    use crate::utils::TargetFormat;
    use image::ImageFormat;

    fn jpeg(name: &str) -> UploadedItem {
        UploadedItem::new(name, fixtures::encoded(&fixtures::rgb(12, 8), ImageFormat::Jpeg))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn full_session_round() {
        let app = AppState::new(ConverterConfig::default());
        let id = SessionId::from("tab-1");

        let snapshot = upload_images(&app, &id, vec![jpeg("one.jpg"), UploadedItem::new("two.png", Vec::<u8>::new())])
            .await
            .unwrap();
        assert_eq!(snapshot.item_names, vec!["one.jpg", "two.png"]);

        let request = ConversionRequest::new(TargetFormat::BMP, 90).unwrap();
        let response = convert_images(&app, &id, request).await.unwrap();
        assert_eq!(response.entries, vec!["one.bmp"]);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].item_name, "two.png");

        let download = download_archive(&app, &id).await.unwrap();
        assert_eq!(download.bytes.len(), response.archive_size);

        let cleared = clear_session(&app, &id).await;
        assert!(cleared.item_names.is_empty() && !cleared.has_archive);
        assert!(download_archive(&app, &id).await.is_none());

        assert!(end_session(&app, &id).await);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_converts_on_one_session_do_not_interleave() {
        let app = AppState::new(ConverterConfig::default());
        let id = SessionId::from("tab-2");
        upload_images(&app, &id, vec![jpeg("a.jpg"), jpeg("b.jpg")]).await.unwrap();

        let png = ConversionRequest::new(TargetFormat::PNG, 90).unwrap();
        let webp = ConversionRequest::new(TargetFormat::WEBP, 90).unwrap();
        let (first, second) = tokio::join!(
            convert_images(&app, &id, png),
            convert_images(&app, &id, webp),
        );
        let (first, second) = (first.unwrap(), second.unwrap());

        // Whichever finished last owns the stored archive, whole.
        let stored = session_snapshot(&app, &id).await.archive_entries;
        assert!(stored == first.entries || stored == second.entries);
        assert!(stored == vec!["a.png", "b.png"] || stored == vec!["a.webp", "b.webp"]);
    }
}
