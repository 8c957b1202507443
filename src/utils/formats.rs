use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::utils::ValidationError;

/// Output formats offered to the user.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetFormat {
    #[default]
    PNG,
    JPEG,
    /// Baseline JPEG written with the `.jfif` extension
    JFIF,
    BMP,
    WEBP,
    AVIF,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 6] = [
        Self::PNG,
        Self::JPEG,
        Self::JFIF,
        Self::BMP,
        Self::WEBP,
        Self::AVIF,
    ];

    /// Display name, as shown in the format picker
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PNG => "PNG",
            Self::JPEG => "JPEG",
            Self::JFIF => "JFIF",
            Self::BMP => "BMP",
            Self::WEBP => "WEBP",
            Self::AVIF => "AVIF",
        }
    }

    /// Lower-cased extension used for archive entry names
    pub fn extension(&self) -> &'static str {
        match self {
            Self::PNG => "png",
            Self::JPEG => "jpeg",
            Self::JFIF => "jfif",
            Self::BMP => "bmp",
            Self::WEBP => "webp",
            Self::AVIF => "avif",
        }
    }

    /// Whether the quality setting has any effect on the encoded output.
    pub fn supports_quality(&self) -> bool {
        matches!(self, Self::JPEG | Self::JFIF | Self::WEBP | Self::AVIF)
    }

    /// The `image` crate format used to verify encoded output
    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            Self::PNG => image::ImageFormat::Png,
            Self::JPEG | Self::JFIF => image::ImageFormat::Jpeg,
            Self::BMP => image::ImageFormat::Bmp,
            Self::WEBP => image::ImageFormat::WebP,
            Self::AVIF => image::ImageFormat::Avif,
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetFormat {
    type Err = ValidationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().as_str() {
            "png" => Ok(Self::PNG),
            "jpeg" | "jpg" => Ok(Self::JPEG),
            "jfif" => Ok(Self::JFIF),
            "bmp" => Ok(Self::BMP),
            "webp" => Ok(Self::WEBP),
            "avif" => Ok(Self::AVIF),
            _ => Err(ValidationError::Format(name.to_string())),
        }
    }
}

/// Extensions accepted on upload
pub const ACCEPTED_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "jfif", "bmp", "webp", "avif"];

/// Get the lower-cased extension of an uploaded file name
pub fn extension_of(name: &str) -> Option<String> {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_lowercase())
}

/// Strip any directory part and the last extension from an uploaded name.
///
/// Falls back to `"image"` when nothing is left (e.g. `".png"`).
pub fn base_name(name: &str) -> &str {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        Some(_) => "",
        None => file_name,
    };
    if stem.trim().is_empty() { "image" } else { stem }
}

/// Build the archive entry name for a converted upload
pub fn output_name(name: &str, format: TargetFormat) -> String {
    format!("{}.{}", base_name(name), format.extension())
}
