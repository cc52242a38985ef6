//! Error types for rtms-collector
//!
//! This module provides the error handling for the library, including:
//! - Domain-specific error types (Config, Database, upstream API)
//! - HTTP status code mapping for the trigger API
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for rtms-collector operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rtms-collector
///
/// Per-region pipeline failures are rendered to a string at the region
/// boundary; everything else propagates to the caller through this type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "DB_PORT")
        key: Option<String>,
    },

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// HTTP client error while talking to the trade API
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The trade API answered with a non-success HTTP status
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not well-formed XML
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The trade API answered with an error result code
    #[error("upstream API error {code}: {message}")]
    Upstream {
        /// Result code reported by the API (e.g. "30")
        code: String,
        /// Result message reported by the API
        message: String,
    },

    /// Invalid request parameter (region code, month, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "invalid_input",
///     "message": "invalid input: region code must be 5 digits",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "config_error", "invalid_input")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - invalid caller input
            Error::InvalidInput(_) => 400,

            // 500 Internal Server Error - misconfiguration and local failures
            Error::Config { .. } => 500,
            Error::Database(_) => 500,
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,

            // 502 Bad Gateway - the trade API misbehaved
            Error::Network(_) => 502,
            Error::Transport(_) => 502,
            Error::MalformedResponse(_) => 502,
            Error::Upstream { .. } => 502,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Database(_) => "database_error",
            Error::Network(_) => "network_error",
            Error::Transport(_) => "transport_error",
            Error::MalformedResponse(_) => "malformed_response",
            Error::Upstream { .. } => "upstream_error",
            Error::InvalidInput(_) => "invalid_input",
            Error::Io(_) => "io_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            Error::Upstream { code, .. } => Some(serde_json::json!({
                "result_code": code,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
