//! Input validation utilities.
//!
//! Domain services run these before touching the store so that malformed input never reaches a
//! critical section.

use crate::{RecordError, RecordResult};
use chrono::{DateTime, Utc};
use mcg_types::{NonEmptyText, TextError};

/// Trims `value` and requires at least `min` characters.
///
/// # Errors
///
/// Returns `RecordError::InvalidInput` naming `field` if the value is blank or too short.
pub fn required_text(field: &str, value: &str, min: usize) -> RecordResult<NonEmptyText> {
    NonEmptyText::with_min_len(value, min).map_err(|err| match err {
        TextError::Empty => RecordError::InvalidInput(format!("{field} is required")),
        TextError::TooShort { min, .. } => {
            RecordError::InvalidInput(format!("{field} must be at least {min} characters"))
        }
    })
}

/// Trims an optional free-text field. Blank input becomes an empty string.
pub fn optional_text(value: &str) -> String {
    value.trim().to_string()
}

/// Requires a timestamp to be present.
pub fn required_date(field: &str, value: Option<DateTime<Utc>>) -> RecordResult<DateTime<Utc>> {
    value.ok_or_else(|| RecordError::InvalidInput(format!("{field} is required")))
}
