//! Unified error type for all layers of the registry.

use crate::UserField;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for the user registry.
///
/// The `Display` output of the client-facing variants (validation, conflict,
/// not-found and token errors) is the exact message returned to callers.
/// Infrastructure variants carry internal detail for logs only; the HTTP
/// layer replaces it with a generic per-operation message.
#[derive(Error, Debug)]
pub enum RegistryError {
    // ============ Domain Errors ============
    /// Malformed input shape.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness constraint was violated on the named field.
    #[error("{} is already registered.", .field.display_name())]
    Conflict { field: UserField },

    /// The store rejected a write on a unique index it could not attribute
    /// to a known field.
    #[error("A user with the same unique value is already registered.")]
    DuplicateKey(String),

    /// No record matched the lookup.
    #[error("User not found. The user with the given {key} does not exist.")]
    NotFound { key: &'static str },

    // ============ Authentication Errors ============
    /// No bearer token on a guarded request.
    #[error("Access denied, no token provided.")]
    MissingToken,

    /// Bearer token failed verification.
    #[error("Invalid or expired token.")]
    InvalidToken(String),

    /// Bearer token is past its expiry.
    #[error("Invalid or expired token.")]
    TokenExpired,

    // ============ Infrastructure Errors ============
    /// Primary store error
    #[error("Database error: {0}")]
    Database(String),

    /// Cache store error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RegistryError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::MissingToken | Self::InvalidToken(_) | Self::TokenExpired => 403,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } | Self::DuplicateKey(_) => 409,
            Self::Database(_)
            | Self::Cache(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict { .. } | Self::DuplicateKey(_) => "CONFLICT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this error must be reported generically to the caller.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }

    /// Creates a not found error for a lookup key such as `"username"` or `"ID"`.
    #[must_use]
    pub const fn not_found(key: &'static str) -> Self {
        Self::NotFound { key }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error for the given field.
    #[must_use]
    pub const fn conflict(field: UserField) -> Self {
        Self::Conflict { field }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for RegistryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound { key: "ID" },
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                match UserField::from_constraint(db_err.message()) {
                    Some(field) => Self::Conflict { field },
                    None => Self::DuplicateKey(db_err.message().to_string()),
                }
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error body.
///
/// Mirrors the envelope every failed operation returns:
/// `{"status": "error", "message": ..., "code": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Always `"error"`.
    pub status: String,
    /// Human-readable message.
    pub message: String,
    /// Numeric code mirroring the HTTP status.
    pub code: u16,
}

impl ErrorResponse {
    /// Creates an error body with an explicit message.
    #[must_use]
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            code,
        }
    }

    /// Creates an error body from a client-facing `RegistryError`.
    #[must_use]
    pub fn from_error(error: &RegistryError) -> Self {
        Self::new(error.status_code(), error.to_string())
    }
}

impl From<&RegistryError> for ErrorResponse {
    fn from(error: &RegistryError) -> Self {
        Self::from_error(error)
    }
}
