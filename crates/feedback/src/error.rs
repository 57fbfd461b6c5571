//! Error types for the feedback service.
//!
//! This module defines all error types used throughout the crate. Validation
//! failures are user-correctable; everything else is a server-side failure.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for feedback operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// A submitted field is missing or malformed.
    #[error("{message}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable description of the unmet rule.
        message: String,
    },

    /// The request body could not be decoded.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    // === Storage Errors ===
    /// Failed to read the record file.
    #[error("failed to read feedback store at {path}: {source}")]
    StorageRead {
        /// Path to the record file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to persist the record file.
    #[error("failed to write feedback store at {path}: {source}")]
    StorageWrite {
        /// Path to the record file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system or socket operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for feedback operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a validation error for the given field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is caused by the client's input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::MalformedPayload(_))
    }

    /// Check if this error comes from the record store.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::StorageRead { .. }
                | Self::StorageWrite { .. }
                | Self::DirectoryCreate { .. }
                | Self::Json(_)
        )
    }

    /// Name of the field that failed validation, if any.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
