//! Unified application error types for CrmDesk.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Expected conditions (missing records,
//! rejected credentials, denied mutations) are returned as values; only
//! unexpected persistence failures carry an underlying source error.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// No valid credential could be resolved for the caller.
    NotAuthenticated,
    /// A presented credential failed signature or structural validation.
    InvalidCredential,
    /// A presented credential has passed its expiry.
    ExpiredCredential,
    /// The caller is authenticated but not permitted to perform the action.
    Forbidden,
    /// A field in a submitted patch is not settable by the caller's role.
    FieldNotAllowed,
    /// The requested record was not found.
    NotFound,
    /// A uniqueness constraint would be violated.
    Conflict,
    /// A domain precondition failed.
    Validation,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "NOT_AUTHENTICATED"),
            Self::InvalidCredential => write!(f, "INVALID_CREDENTIAL"),
            Self::ExpiredCredential => write!(f, "EXPIRED_CREDENTIAL"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::FieldNotAllowed => write!(f, "FIELD_NOT_ALLOWED"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout CrmDesk.
///
/// All crate-specific errors are mapped into `AppError` using explicit
/// `.map_err()` calls. This provides a single error type for the entire
/// application boundary; the CLI renders it, services never panic on it.
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

    /// Create a not-authenticated error.
    pub fn not_authenticated() -> Self {
        Self::new(ErrorKind::NotAuthenticated, "Not authenticated")
    }

    /// Create an invalid-credential error.
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredential, message)
    }

    /// Create an expired-credential error.
    pub fn expired_credential() -> Self {
        Self::new(ErrorKind::ExpiredCredential, "Credential has expired")
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a field-not-allowed error for a rejected patch field.
    pub fn field_not_allowed(field: &str, role: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::FieldNotAllowed,
            format!("Field '{field}' may not be set by role '{role}'"),
        )
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a uniqueness-conflict error for a field/value pair.
    pub fn conflict(field: &str, value: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::Conflict,
            format!("Value '{value}' for field '{field}' is already in use"),
        )
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error is one of the two credential-decode failures.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidCredential | ErrorKind::ExpiredCredential
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = AppError::field_not_allowed("assignee_id", "support");
        let rendered = err.to_string();
        assert!(rendered.starts_with("FIELD_NOT_ALLOWED"));
        assert!(rendered.contains("assignee_id"));
        assert!(rendered.contains("support"));
    }

    #[test]
    fn test_credential_failure_predicate() {
        assert!(AppError::expired_credential().is_credential_failure());
        assert!(AppError::invalid_credential("bad signature").is_credential_failure());
        assert!(!AppError::not_authenticated().is_credential_failure());
    }
}
