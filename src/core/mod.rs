//! Core application types and state management.
//!
//! This module contains the fundamental types used throughout the converter:
//! - [`SessionState`]: uploads and last archive of one session
//! - [`AppState`]: registry of live sessions
//! - [`ConverterConfig`]: settings handed over by the host shell
//! - [`ConversionRequest`], [`ConversionReport`]: input and output of a run
//! - [`BatchProgress`]: progress tracking for a run

mod config;
mod progress;
mod state;
mod types;

pub use config::ConverterConfig;
pub use progress::BatchProgress;
pub use state::{AppState, SessionId, SessionState, SharedSession};
pub use types::{
    ARCHIVE_MIME, ArchiveArtifact, ConversionOutcome, ConversionReport, ConversionRequest,
    ConvertResponse, DEFAULT_ARCHIVE_NAME, DEFAULT_QUALITY, Download, ItemError, SessionSnapshot,
    UploadedItem,
};
