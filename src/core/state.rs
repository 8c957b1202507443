//! Session state and the process-wide session registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::commands::SessionHandler;
use crate::core::{ArchiveArtifact, ConverterConfig, SessionSnapshot, UploadedItem};
use crate::utils::init_tracing;

/// The uploads of one session and the archive built from them.
///
/// Lives as long as the session. Each mutation is a single assignment, so
/// observers never see half of a transition.
#[derive(Debug, Default, Clone)]
pub struct SessionState {
    items: Vec<UploadedItem>,
    artifact: Option<ArchiveArtifact>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[UploadedItem] {
        &self.items
    }

    pub fn artifact(&self) -> Option<&ArchiveArtifact> {
        self.artifact.as_ref()
    }

    /// Replaces the uploads wholesale. The archive is left as it is.
    pub fn set_items(&mut self, items: Vec<UploadedItem>) {
        self.items = items;
    }

    pub fn set_artifact(&mut self, artifact: ArchiveArtifact) {
        self.artifact = Some(artifact);
    }

    /// Drops the uploads and the archive together.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.artifact.is_none()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            item_names: self.items.iter().map(|item| item.name.clone()).collect(),
            has_archive: self.artifact.is_some(),
            archive_entries: self
                .artifact
                .as_ref()
                .map(|a| a.entries.clone())
                .unwrap_or_default(),
        }
    }
}

/// Opaque identifier the shell assigns to one user session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A session handler guarded for one action at a time.
pub type SharedSession = Arc<Mutex<SessionHandler>>;

/// Application state shared by every request the shell forwards.
///
/// Holds the configuration and one [`SessionHandler`] per live session.
/// Sessions are created the first time their id is seen and dropped on
/// [`end_session`](Self::end_session).
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConverterConfig>,
    sessions: Arc<RwLock<HashMap<SessionId, SharedSession>>>,
}

impl AppState {
    /// Builds the registry and installs logging at `config.log_level`.
    ///
    /// A subscriber the host installed earlier is left in place.
    pub fn new(config: ConverterConfig) -> Self {
        init_tracing(&config.log_level);
        Self {
            config: Arc::new(config),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Returns the session for `id`, creating an empty one on first use.
    pub async fn session(&self, id: &SessionId) -> SharedSession {
        if let Some(session) = self.sessions.read().await.get(id) {
            return session.clone();
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id.clone())
            .or_insert_with(|| {
                debug!("Session {} started", id);
                Arc::new(Mutex::new(SessionHandler::new((*self.config).clone())))
            })
            .clone()
    }

    /// Destroys the session and everything it holds. Returns `false` for unknown ids.
    pub async fn end_session(&self, id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            debug!("Session {} ended", id);
        }
        removed
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> ArchiveArtifact {
        ArchiveArtifact {
            file_name: "converted_images.zip".into(),
            bytes: Arc::from(vec![0u8; 4]),
            entries: vec!["a.png".into()],
        }
    }

    #[test]
    fn starts_empty() {
        let state = SessionState::new();
        assert!(state.items().is_empty());
        assert!(state.artifact().is_none());
        assert!(state.is_empty());
    }

    #[test]
    fn set_items_keeps_the_archive() {
        let mut state = SessionState::new();
        state.set_artifact(artifact());
        state.set_items(vec![UploadedItem::new("b.jpg", vec![1u8])]);

        assert_eq!(state.items().len(), 1);
        assert_eq!(state.artifact(), Some(&artifact()));
    }

    #[test]
    fn set_items_replaces_wholesale() {
        let mut state = SessionState::new();
        state.set_items(vec![
            UploadedItem::new("a.png", vec![1u8]),
            UploadedItem::new("b.png", vec![2u8]),
        ]);
        state.set_items(vec![UploadedItem::new("c.png", vec![3u8])]);

        assert_eq!(state.snapshot().item_names, vec!["c.png"]);
    }

    #[test]
    fn clear_resets_items_and_archive_together() {
        let mut state = SessionState::new();
        state.set_items(vec![UploadedItem::new("a.png", vec![1u8])]);
        state.set_artifact(artifact());

        state.clear();

        assert!(state.items().is_empty());
        assert!(state.artifact().is_none());
    }

    #[test]
    fn snapshot_lists_names_and_entries() {
        let mut state = SessionState::new();
        state.set_items(vec![UploadedItem::new("a.jpg", vec![1u8])]);
        state.set_artifact(artifact());

        assert_eq!(
            state.snapshot(),
            SessionSnapshot {
                item_names: vec!["a.jpg".into()],
                has_archive: true,
                archive_entries: vec!["a.png".into()],
            }
        );
    }

    #[test]
    fn new_app_state_installs_logging() {
        let _app = AppState::new(ConverterConfig {
            log_level: "debug".into(),
            ..ConverterConfig::default()
        });
        assert!(!init_tracing("info"));
    }

    #[tokio::test]
    async fn sessions_are_created_on_first_use_and_isolated() {
        let app = AppState::new(ConverterConfig::default());
        let alice = SessionId::from("alice");
        let bob = SessionId::from("bob");

        app.session(&alice)
            .await
            .lock()
            .await
            .state_mut()
            .set_items(vec![UploadedItem::new("a.png", vec![1u8])]);

        let again = app.session(&alice).await;
        assert_eq!(again.lock().await.snapshot().item_names, vec!["a.png"]);
        assert!(app.session(&bob).await.lock().await.snapshot().item_names.is_empty());
        assert_eq!(app.session_count().await, 2);
    }

    #[tokio::test]
    async fn ending_a_session_discards_its_state() {
        let app = AppState::new(ConverterConfig::default());
        let id = SessionId::from("s1");
        app.session(&id)
            .await
            .lock()
            .await
            .state_mut()
            .set_items(vec![UploadedItem::new("a.png", vec![1u8])]);

        assert!(app.end_session(&id).await);
        assert!(!app.end_session(&id).await);
        assert!(app.session(&id).await.lock().await.snapshot().item_names.is_empty());
    }
}
