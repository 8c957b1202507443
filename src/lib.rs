//! Batch image format conversion packaged as a ZIP archive.
//!
//! A host shell (web or desktop) forwards user actions to the handlers in
//! [`commands`]; everything below them is plain synchronous code.

// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod processing;
pub mod commands;

// Public exports for external consumers
pub use crate::core::{
    AppState, ArchiveArtifact, BatchProgress, ConversionReport, ConversionRequest, ConvertResponse,
    ConverterConfig, Download, ItemError, SessionId, SessionSnapshot, SessionState, UploadedItem,
};
pub use crate::processing::{ArchiveBuilder, Codec, ConversionPipeline, ImageCodec};
pub use crate::utils::{ConversionError, ConverterError, ConverterResult, TargetFormat, ValidationError, init_tracing};
pub use commands::*;
