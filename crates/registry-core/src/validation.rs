//! Validation utilities.

use crate::RegistryError;
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `RegistryError` on failure.
    fn validate_request(&self) -> Result<(), RegistryError> {
        self.validate().map_err(validation_errors_to_registry_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to `RegistryError`.
///
/// Field messages are sorted by field name so the resulting text is stable.
#[must_use]
pub fn validation_errors_to_registry_error(errors: ValidationErrors) -> RegistryError {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| format!("{field} is invalid."), |m| m.to_string());
                ((*field).to_string(), message)
            })
        })
        .collect();
    messages.sort();

    let message = messages
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join(" ");

    RegistryError::Validation(message)
}

/// Common validation rules.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }
}
