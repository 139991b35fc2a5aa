//! Unified application error types for CourtHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The [`ErrorKind`] decides how an
//! error is surfaced (HTTP status, retry policy); the optional machine code
//! names the exact business condition for API clients.

use std::fmt;
use thiserror::Error;

/// Stable machine-readable error codes attached to business failures.
pub mod codes {
    /// A slot key could not be decrypted or parsed.
    pub const INVALID_SLOT_KEY: &str = "INVALID_SLOT_KEY";
    /// A slot key is past its `expires_at`.
    pub const SLOT_KEY_EXPIRED: &str = "SLOT_KEY_EXPIRED";
    /// Submitted slot keys disagree on service, activity, or date.
    pub const SLOT_KEYS_MISMATCHED: &str = "SLOT_KEYS_MISMATCHED";
    /// Submitted slots leave a gap or overlap.
    pub const SLOTS_NOT_CONTIGUOUS: &str = "SLOTS_NOT_CONTIGUOUS";
    /// The activity has no compatible enabled resources.
    pub const NO_RESOURCES_AVAILABLE: &str = "NO_RESOURCES_AVAILABLE";
    /// Every compatible resource lacks a slot configuration.
    pub const NO_VALID_POOL: &str = "NO_VALID_POOL";
    /// The pool recorded in the slot key no longer exists.
    pub const POOL_CHANGED: &str = "POOL_CHANGED";
    /// No resource can serve the requested range.
    pub const NO_AVAILABLE_RESOURCES: &str = "NO_AVAILABLE_RESOURCES";
    /// Two writers raced on the same idempotency key.
    pub const DUPLICATE_IDEMPOTENCY_KEY: &str = "DUPLICATE_IDEMPOTENCY_KEY";
    /// The database aborted a serializable transaction.
    pub const SERIALIZATION_FAILURE: &str = "SERIALIZATION_FAILURE";
    /// A booking status transition is not permitted.
    pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
    /// A requested range does not line up with the slot grid.
    pub const MISALIGNED_RANGE: &str = "MISALIGNED_RANGE";
}

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested entity was not found.
    NotFound,
    /// The caller identity is missing or unusable.
    Authentication,
    /// The caller is not allowed to perform the action.
    Authorization,
    /// Input validation failed (malformed token, non-contiguous selection, …).
    Validation,
    /// A business conflict occurred; the caller may retry with fresh data.
    Conflict,
    /// Venue or slot configuration is missing or invalid.
    Configuration,
    /// A database error occurred.
    Database,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Database => write!(f, "DATABASE"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout CourtHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// Optional stable code from [`codes`].
    pub code: Option<&'static str>,
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
            code: None,
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
            code: None,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Attach a machine-readable code.
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Whether this error carries the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.code == Some(code)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            code: self.code,
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

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("Row not found"),
            other => Self::with_source(
                ErrorKind::Database,
                format!("Database error: {other}"),
                other,
            ),
        }
    }
}
