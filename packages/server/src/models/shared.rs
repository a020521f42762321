use crate::error::AppError;

/// Message returned for any missing or empty registration field.
pub const REQUIRED_FIELDS_MESSAGE: &str =
    "All fields are required. Games must be a non-empty array.";

/// Return a required text field as submitted, or a validation error when it is
/// absent or empty.
pub fn require_text(value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(REQUIRED_FIELDS_MESSAGE.into())),
    }
}
