//! Error types for the image converter.
//!
//! Two layers, both built with `thiserror`:
//! - [`ConversionError`]: scoped to a single uploaded item. The pipeline records
//!   it next to the item name and moves on to the next item.
//! - [`ConverterError`]: returned to the caller of a session action.

use serde::Serialize;
use thiserror::Error;

/// Failure converting one uploaded item. Never fatal to the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConversionError {
    /// Input bytes are not a recognizable image
    #[error("Decode error: {0}")]
    Decode(String),
    /// Codec rejected the target format for this image
    #[error("Encode error: {0}")]
    Encode(String),
}

/// Validation errors for uploads, requests and configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValidationError {
    /// Quality outside 1-100
    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    Quality(u32),
    /// Upload carries an extension the converter does not accept
    #[error("Unsupported file format '{extension}' for {name}")]
    UnsupportedExtension { name: String, extension: String },
    /// Upload name has no extension at all
    #[error("File has no extension: {0}")]
    MissingExtension(String),
    /// Upload name is empty or only whitespace
    #[error("File name cannot be empty")]
    EmptyName,
    /// Convert was triggered with no uploaded images
    #[error("No images uploaded")]
    NothingToConvert,
    /// Unknown target format name
    #[error("Unsupported output format: {0}")]
    Format(String),
    /// Configuration value rejected
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Main error type returned by session actions.
///
/// Serializable so a presentation shell can forward it to the user verbatim.
#[derive(Error, Debug, Serialize)]
pub enum ConverterError {
    /// Request, upload or configuration validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Building the ZIP archive failed
    #[error("Archive error: {0}")]
    Archive(String),

    /// Background task for a session action failed
    #[error("Session error: {0}")]
    Session(String),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

/// Convenience result type for converter operations.
pub type ConverterResult<T> = Result<T, ConverterError>;

// Helper methods for error creation
impl ConversionError {
    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    pub fn encode(err: impl std::fmt::Display) -> Self {
        Self::Encode(err.to_string())
    }
}

impl ValidationError {
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

// Convert zip::result::ZipError to ConverterError
impl From<zip::result::ZipError> for ConverterError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}

// In-memory writes only fail when the ZIP writer itself does
impl From<std::io::Error> for ConverterError {
    fn from(err: std::io::Error) -> Self {
        Self::Archive(err.to_string())
    }
}

impl From<serde_json::Error> for ConverterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ConverterError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Session(format!("Task panicked: {err}"))
    }
}
