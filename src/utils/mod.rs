pub mod error;
pub mod validation;
pub mod formats;
pub mod logging;

pub use error::{ConversionError, ConverterError, ConverterResult, ValidationError};
pub use validation::{validate_quality, validate_upload, validate_uploads};
pub use formats::{ACCEPTED_EXTENSIONS, TargetFormat, base_name, extension_of, output_name};
pub use logging::init_tracing;
