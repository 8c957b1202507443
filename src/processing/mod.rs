//! Image conversion and packaging.
//!
//! - [`codec`]: decode/encode through the `image` crate behind the [`Codec`] trait
//! - [`archive`]: in-memory ZIP writer
//! - [`pipeline`]: per-batch orchestration with per-item failure isolation

pub mod archive;
pub mod codec;
pub mod pipeline;

pub use archive::ArchiveBuilder;
pub use codec::{Codec, ImageCodec};
pub use pipeline::ConversionPipeline;
