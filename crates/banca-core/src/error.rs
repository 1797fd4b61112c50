//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Banca.
///
/// The variants mirror the tiers of the system: domain failures
/// (`NotFound`, `AlreadyExists`, `Validation`), remote-store failures
/// (`RemoteUnavailable`, `RemoteWriteFailed`), and infrastructure failures
/// (`Database`, `Cache`, `Configuration`).
#[derive(Error, Debug)]
pub enum BancaError {
    // ============ Domain Errors ============
    /// Resource not found at the tier that is authoritative for the query.
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Duplicate-prevention violation on create.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Remote Store Errors ============
    /// Transient failure talking to the remote store. Eligible for
    /// caller-side retry.
    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(String),

    /// The remote store rejected a write (e.g. a uniqueness constraint).
    /// Not retryable without changing the input.
    #[error("Remote write failed: {0}")]
    RemoteWriteFailed(String),

    /// The local mirror of a remote write failed. Non-fatal: logged by the
    /// service layer and never surfaced past it, since the remote copy is
    /// authoritative and the local store self-heals on the next
    /// read-through miss.
    #[error("Local mirror failed: {0}")]
    LocalMirrorFailed(String),

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BancaError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::AlreadyExists(_) => 409,
            Self::RemoteUnavailable(_) => 503,
            Self::RemoteWriteFailed(_) => 502,
            Self::LocalMirrorFailed(_)
            | Self::Database(_)
            | Self::Cache(_)
            | Self::Configuration(_)
            | Self::Serialization(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::RemoteUnavailable(_) => "REMOTE_UNAVAILABLE",
            Self::RemoteWriteFailed(_) => "REMOTE_WRITE_FAILED",
            Self::LocalMirrorFailed(_) => "LOCAL_MIRROR_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates an already-exists error.
    #[must_use]
    pub fn already_exists<T: Into<String>>(message: T) -> Self {
        Self::AlreadyExists(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a remote-unavailable error.
    #[must_use]
    pub fn remote_unavailable<T: Into<String>>(message: T) -> Self {
        Self::RemoteUnavailable(message.into())
    }

    /// Creates a remote-write-failed error.
    #[must_use]
    pub fn remote_write_failed<T: Into<String>>(message: T) -> Self {
        Self::RemoteWriteFailed(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    ///
    /// Only transient failures qualify; a rejected remote write will fail
    /// again with the same input.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::RemoteUnavailable(_) | Self::Database(_) | Self::Cache(_)
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for BancaError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    return Self::AlreadyExists(db_err.message().to_string());
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for BancaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `BancaError`.
    #[must_use]
    pub fn from_error(error: &BancaError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&BancaError> for ErrorResponse {
    fn from(error: &BancaError) -> Self {
        Self::from_error(error)
    }
}
