use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::core::{ConversionRequest, DEFAULT_ARCHIVE_NAME, DEFAULT_QUALITY};
use crate::utils::{ACCEPTED_EXTENSIONS, ConverterResult, TargetFormat, ValidationError, validate_quality};

/// Settings the host shell hands to the converter at startup.
///
/// Every field has a default, so a partial JSON object is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConverterConfig {
    /// Format preselected in the format picker
    pub default_format: TargetFormat,
    /// Quality preselected on the slider (1-100)
    pub default_quality: u8,
    /// File name of the downloadable archive
    pub archive_name: String,
    /// Upload extensions accepted, without the dot
    pub accepted_extensions: Vec<String>,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            default_format: TargetFormat::PNG,
            default_quality: DEFAULT_QUALITY,
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            accepted_extensions: ACCEPTED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            log_level: "info".to_string(),
        }
    }
}

impl ConverterConfig {
    /// Parses and validates a JSON config object
    pub fn from_json(json: &str) -> ConverterResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_quality(u32::from(self.default_quality))?;

        if !self.archive_name.to_lowercase().ends_with(".zip") || self.archive_name.len() <= 4 {
            return Err(ValidationError::settings(format!(
                "Archive name must end in .zip: {}",
                self.archive_name
            )));
        }

        if self.accepted_extensions.is_empty() {
            return Err(ValidationError::settings("At least one upload extension is required"));
        }

        if let Err(err) = EnvFilter::try_new(&self.log_level) {
            return Err(ValidationError::settings(format!(
                "Invalid log level '{}': {}",
                self.log_level, err
            )));
        }

        Ok(())
    }

    /// The request a fresh session starts with
    pub fn default_request(&self) -> ConversionRequest {
        ConversionRequest {
            target_format: self.default_format,
            quality: self.default_quality,
        }
    }
}
