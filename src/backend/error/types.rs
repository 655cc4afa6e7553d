/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in handlers and middleware and can be converted
 * to HTTP responses.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Generic request failures carrying their own status code.
 *
 * ## Security Rejections
 *
 * - CSRF verification failures (403)
 * - Rate limit rejections (429, with a retry hint)
 *
 * ## Infrastructure Errors
 *
 * - Configuration errors
 * - Database errors
 * - JSON serialization errors
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::ConfigError;

/// Backend-specific error types
///
/// Each variant maps to an HTTP status code via [`BackendError::status_code`].
///
/// # Usage
///
/// ```rust
/// use chatapp::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
/// let err = BackendError::csrf("invalid csrf token");
/// let err = BackendError::rate_limited("Too many requests", 60);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., invalid request)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// CSRF token missing or invalid
    #[error("CSRF error: {message}")]
    CsrfError {
        /// Human-readable error message
        message: String,
    },

    /// Client exceeded its request quota
    #[error("Rate limited: {message}")]
    RateLimited {
        /// Message returned to the client
        message: String,
        /// Seconds until the client's window resets
        retry_after_secs: u64,
    },

    /// Configuration error
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a new CSRF error
    pub fn csrf(message: impl Into<String>) -> Self {
        Self::CsrfError {
            message: message.into(),
        }
    }

    /// Create a new rate-limit rejection
    pub fn rate_limited(message: impl Into<String>, retry_after_secs: u64) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_secs,
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `CsrfError` - 403 Forbidden
    /// - `RateLimited` - 429 Too Many Requests
    /// - `ConfigError` - 500 Internal Server Error
    /// - `DatabaseError` - 503 Service Unavailable
    /// - `SerializationError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::CsrfError { .. } => StatusCode::FORBIDDEN,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::DatabaseError(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    ///
    /// Database errors are not echoed to clients.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::CsrfError { message } => message.clone(),
            Self::RateLimited { message, .. } => message.clone(),
            Self::ConfigError(err) => err.to_string(),
            Self::DatabaseError(_) => "Database unavailable".to_string(),
            Self::SerializationError(err) => err.to_string(),
        }
    }
}
