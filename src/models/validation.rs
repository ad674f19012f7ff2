//! Field parsing and validation functions for raw interaction records
//!
//! The `validate_*` functions plug into the `validator` derive; the
//! `parse_*` functions return the parsed value or a [`ValidationError`]
//! naming the offending field.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use validator::ValidationError;

use super::error::{ValidationError as ModelValidationError, ValidationErrorKind};
use super::interaction::InteractionKind;

/// Naive layouts accepted besides RFC 3339, taken as UTC
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Validate interaction kind for validator crate
pub fn validate_interaction_kind(kind: &str) -> Result<(), ValidationError> {
    kind.parse::<InteractionKind>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_interaction_kind"))
}

/// Validate an integer field for validator crate
pub fn validate_integer(value: &str) -> Result<(), ValidationError> {
    value
        .trim()
        .parse::<i64>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_integer"))
}

/// Parse a required integer field
pub fn parse_integer_field(value: &str, field_name: &str) -> Result<i64, ModelValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::new(
            ValidationErrorKind::RequiredField,
            field_name,
        ));
    }
    trimmed.parse::<i64>().map_err(|e| {
        ModelValidationError::with_context(
            ValidationErrorKind::InvalidInteger,
            field_name,
            format!("Failed to parse '{}': {}", trimmed, e),
        )
    })
}

/// Parse a watch duration, treating blank as zero and clamping negatives to zero
pub fn parse_duration_field(value: &str, field_name: &str) -> Result<u64, ModelValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let seconds = parse_integer_field(trimmed, field_name)?;
    Ok(clamp_duration(seconds))
}

/// Clamp a signed duration to the non-negative range
pub fn clamp_duration(seconds: i64) -> u64 {
    seconds.max(0) as u64
}

/// Parse an ISO 8601 timestamp
///
/// Accepts RFC 3339, naive date-times separated by `T` or a space, and plain
/// dates (midnight). Naive values are interpreted as UTC.
pub fn parse_timestamp_field(
    timestamp: &str,
    field_name: &str,
) -> Result<DateTime<Utc>, ModelValidationError> {
    let trimmed = timestamp.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::new(
            ValidationErrorKind::RequiredField,
            field_name,
        ));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(ModelValidationError::with_context(
        ValidationErrorKind::InvalidTimestamp,
        field_name,
        format!("Failed to parse timestamp: {}", trimmed),
    ))
}

/// Parse the interaction kind field
pub fn parse_kind_field(
    kind: &str,
    field_name: &str,
) -> Result<InteractionKind, ModelValidationError> {
    kind.parse::<InteractionKind>()
        .map_err(|e| ModelValidationError { field: field_name.to_string(), ..e })
}

/// Trim a platform name, rejecting blank names
pub fn normalize_platform_name(name: &str) -> Result<String, ModelValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::new(
            ValidationErrorKind::EmptyPlatformName,
            "nome_plataforma",
        ));
    }
    Ok(trimmed.to_string())
}
