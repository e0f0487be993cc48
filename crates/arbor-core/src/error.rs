//! Unified application error types for Arbor.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator.

use std::fmt;
use thiserror::Error;

/// Message returned to callers in place of server-side fault details.
pub const GENERIC_FAILURE_MESSAGE: &str = "Internal server error";

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The entity does not exist or is not owned by the caller.
    NotFound,
    /// A sibling-name uniqueness rule would be violated.
    Conflict,
    /// A folder move would make a folder its own ancestor.
    Cycle,
    /// Stored data violates an invariant the store is meant to guarantee.
    Integrity,
    /// The caller acted outside their ownership scope.
    Authorization,
    /// The principal could not be authenticated.
    Authentication,
    /// Input validation failed.
    Validation,
    /// A database error occurred.
    Database,
    /// A blob storage I/O error occurred.
    Storage,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether errors of this kind are caused by the caller's request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound
                | Self::Conflict
                | Self::Cycle
                | Self::Authorization
                | Self::Authentication
                | Self::Validation
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Cycle => write!(f, "CYCLE"),
            Self::Integrity => write!(f, "INTEGRITY"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Database => write!(f, "DATABASE"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Arbor.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a cycle error.
    pub fn cycle(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cycle, message)
    }

    /// Create an integrity error.
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Integrity, message)
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error was caused by the caller's request.
    pub fn is_client_error(&self) -> bool {
        self.kind.is_client_error()
    }

    /// The message safe to hand back to a caller.
    ///
    /// Server-side faults, including integrity violations, collapse to a
    /// generic message so internal state is never echoed verbatim.
    pub fn public_message(&self) -> &str {
        if self.is_client_error() {
            &self.message
        } else {
            GENERIC_FAILURE_MESSAGE
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = AppError::conflict("Folder 'Docs' already exists here");
        assert!(err.is_client_error());
        assert_eq!(err.public_message(), "Folder 'Docs' already exists here");

        let err = AppError::cycle("Cannot move a folder into its own descendant");
        assert_eq!(
            err.public_message(),
            "Cannot move a folder into its own descendant"
        );
    }

    #[test]
    fn test_integrity_errors_are_masked() {
        let err = AppError::integrity("folder 42 references missing parent 7");
        assert!(!err.is_client_error());
        assert_eq!(err.public_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(
            err.to_string(),
            "INTEGRITY: folder 42 references missing parent 7"
        );
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: AppError = io.into();
        assert!(err.source.is_some());
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Storage);
        assert!(cloned.source.is_none());
    }
}
