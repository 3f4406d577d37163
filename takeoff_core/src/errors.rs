//! # Error Types
//!
//! Structured error types for takeoff_core. Every error is fatal for a run:
//! an estimate is either complete or explicitly absent, so nothing here is
//! retried or skipped.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::errors::{TakeoffError, TakeoffResult};
//!
//! fn validate_length(length_cm: f64) -> TakeoffResult<()> {
//!     if length_cm <= 0.0 {
//!         return Err(TakeoffError::invalid_input(
//!             "length_cm",
//!             length_cm.to_string(),
//!             "Beam length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for takeoff_core operations
pub type TakeoffResult<T> = Result<T, TakeoffError>;

/// Structured error type for takeoff operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum TakeoffError {
    /// An input value violates a domain invariant (non-positive length, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Manifest references a beam type with no spec
    #[error("Unknown beam type '{beam_type}' in manifest group '{group}'")]
    UnknownBeamType { beam_type: String, group: String },

    /// A bar size is referenced but absent from the steel catalog
    #[error("Unknown bar size '{bar_size}' referenced by {referenced_by}")]
    UnknownBarSize {
        bar_size: String,
        referenced_by: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/CSV serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

/// Broad classification of a [`TakeoffError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Inputs are inconsistent or malformed (unknown keys, bad documents)
    Configuration,
    /// A numeric value breaks a geometric invariant
    DomainInvariant,
    /// Reading or writing a file failed
    Io,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorCategory::Configuration => "Configuration error",
            ErrorCategory::DomainInvariant => "Domain invariant violation",
            ErrorCategory::Io => "I/O error",
        };
        f.write_str(text)
    }
}

impl TakeoffError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        TakeoffError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        TakeoffError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownBeamType error
    pub fn unknown_beam_type(beam_type: impl Into<String>, group: impl Into<String>) -> Self {
        TakeoffError::UnknownBeamType {
            beam_type: beam_type.into(),
            group: group.into(),
        }
    }

    /// Create an UnknownBarSize error
    pub fn unknown_bar_size(bar_size: impl Into<String>, referenced_by: impl Into<String>) -> Self {
        TakeoffError::UnknownBarSize {
            bar_size: bar_size.into(),
            referenced_by: referenced_by.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        TakeoffError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        TakeoffError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Classify the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            TakeoffError::InvalidInput { .. } => ErrorCategory::DomainInvariant,
            TakeoffError::FileError { .. } => ErrorCategory::Io,
            TakeoffError::MissingField { .. }
            | TakeoffError::UnknownBeamType { .. }
            | TakeoffError::UnknownBarSize { .. }
            | TakeoffError::SerializationError { .. }
            | TakeoffError::VersionMismatch { .. } => ErrorCategory::Configuration,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            TakeoffError::InvalidInput { .. } => "INVALID_INPUT",
            TakeoffError::MissingField { .. } => "MISSING_FIELD",
            TakeoffError::UnknownBeamType { .. } => "UNKNOWN_BEAM_TYPE",
            TakeoffError::UnknownBarSize { .. } => "UNKNOWN_BAR_SIZE",
            TakeoffError::FileError { .. } => "FILE_ERROR",
            TakeoffError::SerializationError { .. } => "SERIALIZATION_ERROR",
            TakeoffError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = TakeoffError::unknown_bar_size("#9", "beam type 'B1' waist bars");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("UnknownBarSize"));
        let roundtrip: TakeoffError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(TakeoffError::missing_field("count").error_code(), "MISSING_FIELD");
        assert_eq!(TakeoffError::unknown_beam_type("G1", "1F").error_code(), "UNKNOWN_BEAM_TYPE");
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            TakeoffError::unknown_beam_type("G1", "1F").category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            TakeoffError::invalid_input("length_cm", "-1", "must be positive").category(),
            ErrorCategory::DomainInvariant
        );
        assert_eq!(
            TakeoffError::file_error("open", "x.json", "not found").category(),
            ErrorCategory::Io
        );
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Configuration.to_string(), "Configuration error");
        assert_eq!(ErrorCategory::DomainInvariant.to_string(), "Domain invariant violation");
        assert_eq!(ErrorCategory::Io.to_string(), "I/O error");
    }

    #[test]
    fn test_error_display() {
        let error = TakeoffError::unknown_beam_type("G1", "2F");
        assert_eq!(error.to_string(), "Unknown beam type 'G1' in manifest group '2F'");
    }
}
