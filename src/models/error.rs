//! Validation error types for interaction records
//!
//! These errors describe data-quality problems in a single record. They are
//! absorbed by the analysis pipeline (the record is skipped) and never abort a
//! batch.

use std::fmt;
use thiserror::Error;

/// Main validation error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The kind of validation error
    pub kind: ValidationErrorKind,
    /// The field that failed validation
    pub field: String,
    /// Optional additional context
    pub context: Option<String>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(kind: ValidationErrorKind, field: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            context: None,
        }
    }

    /// Create a validation error with additional context
    pub fn with_context(
        kind: ValidationErrorKind,
        field: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            field: field.into(),
            context: Some(context.into()),
        }
    }

    /// Add context to an existing error
    pub fn add_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(
                f,
                "Validation failed for field '{}': {} - {}",
                self.field, self.kind, ctx
            ),
            None => write!(
                f,
                "Validation failed for field '{}': {}",
                self.field, self.kind
            ),
        }
    }
}

/// Specific validation error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Interaction kind outside the fixed set
    #[error("Invalid interaction kind (expected: view_start, like, share, or comment)")]
    InvalidInteractionKind,

    /// Value is not an integer
    #[error("Invalid integer")]
    InvalidInteger,

    /// Invalid timestamp format
    #[error("Invalid ISO 8601 timestamp")]
    InvalidTimestamp,

    /// Field is required but missing
    #[error("Required field is missing")]
    RequiredField,

    /// Comment interaction without text
    #[error("Comment interactions require comment text")]
    MissingComment,

    /// Platform name is blank
    #[error("Platform name cannot be empty")]
    EmptyPlatformName,

    /// Custom validation error
    #[error("{0}")]
    Custom(String),
}

impl ValidationErrorKind {
    /// Short label for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::InvalidInteractionKind => "invalid_kind",
            ValidationErrorKind::InvalidInteger => "invalid_integer",
            ValidationErrorKind::InvalidTimestamp => "invalid_timestamp",
            ValidationErrorKind::RequiredField => "required_field",
            ValidationErrorKind::MissingComment => "missing_comment",
            ValidationErrorKind::EmptyPlatformName => "empty_platform_name",
            ValidationErrorKind::Custom(_) => "custom",
        }
    }
}

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Collection of validation errors
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation error to the collection
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Names of the offending fields, in the order they were reported
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    /// Check if any collected error has the given kind
    pub fn contains_kind(&self, kind: &ValidationErrorKind) -> bool {
        self.errors.iter().any(|e| &e.kind == kind)
    }

    /// Convert to a Result
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "No validation errors")
        } else {
            write!(f, "Validation failed with {} error(s):", self.errors.len())?;
            for error in &self.errors {
                write!(f, "\n  - {}", error)?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.add(error);
        errors
    }
}

/// Convert validation errors to application errors
impl From<ValidationError> for crate::error::Error {
    fn from(err: ValidationError) -> Self {
        crate::error::Error::validation(err.to_string())
    }
}

impl From<ValidationErrors> for crate::error::Error {
    fn from(err: ValidationErrors) -> Self {
        crate::error::Error::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_with_context() {
        let error = ValidationError::with_context(
            ValidationErrorKind::InvalidInteractionKind,
            "tipo_interacao",
            "Unknown interaction kind: bogus",
        );
        assert_eq!(error.field, "tipo_interacao");
        assert_eq!(
            error.context.as_deref(),
            Some("Unknown interaction kind: bogus")
        );
        assert!(error.to_string().contains("Invalid interaction kind"));
    }

    #[test]
    fn test_add_context() {
        let error = ValidationError::new(ValidationErrorKind::RequiredField, "id_conteudo")
            .add_context("field absent from record");
        assert_eq!(error.context.as_deref(), Some("field absent from record"));
    }

    #[test]
    fn test_validation_errors_collection() {
        let mut errors = ValidationErrors::new();
        let ok = errors.clone().into_result("fine");
        assert_eq!(ok.unwrap(), "fine");

        errors.add(ValidationError::new(
            ValidationErrorKind::InvalidInteger,
            "id_usuario",
        ));
        errors.add(ValidationError::new(
            ValidationErrorKind::InvalidTimestamp,
            "timestamp_interacao",
        ));

        assert_eq!(errors.len(), 2);
        assert!(errors.contains_kind(&ValidationErrorKind::InvalidTimestamp));
        assert!(!errors.contains_kind(&ValidationErrorKind::MissingComment));
        assert!(errors.to_string().contains("2 error(s)"));
        assert!(errors.into_result(()).is_err());
    }

    #[test]
    fn test_into_application_error() {
        let error = ValidationError::new(ValidationErrorKind::EmptyPlatformName, "nome_plataforma");
        let app: crate::error::Error = error.into();
        assert!(app.is_recoverable());
    }
}
