//! Error handling module for the engagement engine
//!
//! This module defines the crate-wide error type. Structural errors (duplicate
//! inserts, corrupted stores) propagate to the caller, while data-quality
//! errors are absorbed per record by the analysis pipeline.

use thiserror::Error;

use crate::store::StoreError;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the engagement engine
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ordered store errors (duplicate keys, broken invariants)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Validation errors for incoming records
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Check if this error concerns a single bad record and can be skipped
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Serialization(_))
    }

    /// Short machine-friendly name of the error category
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::Config(_) => "configuration_error",
            Error::Store(StoreError::DuplicateKey { .. }) => "duplicate_key",
            Error::Store(StoreError::Corrupted(_)) => "store_corrupted",
            Error::Validation(_) => "validation_error",
            Error::Serialization(_) => "serialization_error",
            Error::Io(_) => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }
}

/// Convert from envconfig::Error to our Error type
impl From<envconfig::Error> for Error {
    fn from(err: envconfig::Error) -> Self {
        Error::Config(err.to_string())
    }
}
