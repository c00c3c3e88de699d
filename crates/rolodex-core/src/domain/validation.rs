//! Centralized field validation for the domain types.
//!
//! Every record kind funnels its field checks through these helpers so the
//! constructors, patch application, and persistence mappers all enforce the
//! same rules and produce the same error messages.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Maximum length for record identifiers.
pub const MAX_ID_LENGTH: usize = 10;

/// Maximum length for contact first/last names.
pub const MAX_NAME_LENGTH: usize = 10;

/// Maximum length for the contact address field.
pub const MAX_ADDRESS_LENGTH: usize = 30;

/// Maximum length for the task name field.
pub const MAX_TASK_NAME_LENGTH: usize = 20;

/// Maximum length for task/appointment descriptions.
pub const MAX_DESCRIPTION_LENGTH: usize = 50;

/// Maximum length for the project name field.
pub const MAX_PROJECT_NAME_LENGTH: usize = 50;

/// Maximum length for the project description field.
pub const MAX_PROJECT_DESCRIPTION_LENGTH: usize = 100;

/// Required length for phone numbers (digits only).
pub const PHONE_LENGTH: usize = 10;

/// A field value that violates the domain constraints.
///
/// Always raised before any store access; never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {message}")]
pub struct ValidationError {
    /// Name of the offending field, e.g. `contactId`.
    pub field: &'static str,
    /// Human-readable description of the violation.
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Trims `value` and checks its character count against `min..=max`.
///
/// Returns the trimmed value so callers store the normalized form.
pub fn validate_trimmed_length(
    value: &str,
    field: &'static str,
    min: usize,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(ValidationError::new(
            field,
            format!("must be between {min} and {max} characters, got {len}"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Rejects blank values; returns the trimmed form.
///
/// Used for id arguments so callers can pass `" C1 "` and still target the
/// record stored as `"C1"`.
pub fn validate_not_blank(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "must not be blank"));
    }
    Ok(trimmed.to_string())
}

/// Requires exactly `len` ASCII digits after trimming.
pub fn validate_digits(
    value: &str,
    field: &'static str,
    len: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.len() != len || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new(
            field,
            format!("must be exactly {len} digits"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Rejects timestamps that are already in the past.
pub fn validate_not_past(
    value: DateTime<Utc>,
    field: &'static str,
) -> Result<DateTime<Utc>, ValidationError> {
    if value < Utc::now() {
        return Err(ValidationError::new(field, "must not be in the past"));
    }
    Ok(value)
}
