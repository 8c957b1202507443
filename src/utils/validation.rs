use crate::core::UploadedItem;
use crate::utils::{ValidationError, extension_of};

/// Validates one uploaded item against the accepted extension list
pub fn validate_upload(item: &UploadedItem, accepted: &[String]) -> Result<(), ValidationError> {
    if item.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let extension = extension_of(&item.name)
        .ok_or_else(|| ValidationError::MissingExtension(item.name.clone()))?;

    if !accepted.iter().any(|a| a.eq_ignore_ascii_case(&extension)) {
        return Err(ValidationError::UnsupportedExtension {
            name: item.name.clone(),
            extension,
        });
    }

    Ok(())
}

/// Validates a whole upload, stopping at the first rejected item
pub fn validate_uploads(items: &[UploadedItem], accepted: &[String]) -> Result<(), ValidationError> {
    items.iter().try_for_each(|item| validate_upload(item, accepted))
}

/// Validates a quality value (1-100)
pub fn validate_quality(quality: u32) -> Result<u8, ValidationError> {
    match quality {
        1..=100 => Ok(quality as u8),
        _ => Err(ValidationError::Quality(quality)),
    }
}
