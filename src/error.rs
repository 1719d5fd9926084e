//! Error types for media-dl
//!
//! This module provides:
//! - The crate-wide [`Error`] enum and [`Result`] alias
//! - [`StoreError`] for job table snapshot failures
//! - HTTP status code mapping ([`ToHttpStatus`]) and the JSON [`ApiError`] body

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for media-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-dl
///
/// Probe and fetch failures are not represented here: they are recorded on the
/// job record and never surface as errors to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "download_dir")
        key: Option<String>,
    },

    /// Invalid client input (missing or malformed URL)
    #[error("invalid {field}: {message}")]
    Validation {
        /// The request field that failed validation
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// Job table snapshot error
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Job not found
    #[error("job not found: {0}")]
    NotFound(String),

    /// Queue bound reached, submission rejected
    #[error("queue full: {depth} jobs already waiting")]
    QueueFull {
        /// Number of jobs waiting when the submission was rejected
        depth: usize,
    },

    /// Shutdown in progress - not accepting new jobs
    #[error("shutdown in progress: not accepting new jobs")]
    ShuttingDown,

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Configured external tool is missing
    #[error("external tool error: {0}")]
    ExternalTool(String),
}

impl Error {
    /// Shorthand for a validation failure on `field`
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Job table snapshot errors
///
/// These are logged by the store and never fail the in-memory operation that
/// triggered them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Snapshot could not be read
    #[error("failed to read snapshot {path}: {reason}")]
    Read {
        /// Snapshot path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Snapshot could not be written
    #[error("failed to write snapshot {path}: {reason}")]
    Write {
        /// Snapshot path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Snapshot content is not a valid job table
    #[error("malformed snapshot {path}: {reason}")]
    Malformed {
        /// Snapshot path
        path: PathBuf,
        /// Parser message
        reason: String,
    },
}

/// API error response format
///
/// ```json
/// {
///   "error": {
///     "code": "validation_error",
///     "message": "invalid url: missing",
///     "details": { "field": "url" }
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
    /// Machine-readable error code (e.g., "not_found", "validation_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
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
            // 400 Bad Request - Client error (invalid input)
            Error::Config { .. } => 400,
            Error::Validation { .. } => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,

            // 500 Internal Server Error - Server-side issues
            Error::Store(_) => 500,
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,

            // 503 Service Unavailable
            Error::QueueFull { .. } => 503,
            Error::ShuttingDown => 503,
            Error::ExternalTool(_) => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation { .. } => "validation_error",
            Error::Store(_) => "store_error",
            Error::Io(_) => "io_error",
            Error::NotFound(_) => "not_found",
            Error::QueueFull { .. } => "queue_full",
            Error::ShuttingDown => "shutting_down",
            Error::ApiServerError(_) => "api_server_error",
            Error::ExternalTool(_) => "external_tool_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({ "key": key })),
            Error::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
            Error::QueueFull { depth } => Some(serde_json::json!({ "queue_depth": depth })),
            Error::Store(
                StoreError::Read { path, .. }
                | StoreError::Write { path, .. }
                | StoreError::Malformed { path, .. },
            ) => Some(serde_json::json!({ "path": path })),
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

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn all_error_variants() -> Vec<(Error, u16, &'static str)> {
        vec![
            (
                Error::Config {
                    message: "bad value".into(),
                    key: Some("download_dir".into()),
                },
                400,
                "config_error",
            ),
            (
                Error::validation("url", "missing"),
                400,
                "validation_error",
            ),
            (Error::NotFound("job 42".into()), 404, "not_found"),
            (
                Error::Store(StoreError::Write {
                    path: PathBuf::from("/downloads/download_status.json"),
                    reason: "read-only file system".into(),
                }),
                500,
                "store_error",
            ),
            (
                Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
                500,
                "io_error",
            ),
            (
                Error::ApiServerError("bind failed".into()),
                500,
                "api_server_error",
            ),
            (Error::QueueFull { depth: 10 }, 503, "queue_full"),
            (Error::ShuttingDown, 503, "shutting_down"),
            (
                Error::ExternalTool("yt-dlp missing".into()),
                503,
                "external_tool_error",
            ),
        ]
    }

    #[test]
    fn every_variant_maps_to_expected_status_and_code() {
        for (error, status, code) in all_error_variants() {
            assert_eq!(error.status_code(), status, "status for {error:?}");
            assert_eq!(error.error_code(), code, "code for {error:?}");
        }
    }

    #[test]
    fn validation_error_carries_field_detail() {
        let api_error: ApiError = Error::validation("url", "missing").into();
        assert_eq!(api_error.error.code, "validation_error");
        assert!(api_error.error.message.contains("url"));
        assert_eq!(api_error.error.details.unwrap()["field"], "url");
    }

    #[test]
    fn store_error_carries_path_detail() {
        let api_error: ApiError = Error::Store(StoreError::Malformed {
            path: PathBuf::from("/d/s.json"),
            reason: "expected value".into(),
        })
        .into();
        assert_eq!(api_error.error.details.unwrap()["path"], "/d/s.json");
    }

    #[test]
    fn details_are_omitted_from_json_when_absent() {
        let api_error: ApiError = Error::ShuttingDown.into();
        let json = serde_json::to_value(&api_error).unwrap();
        assert!(json["error"].get("details").is_none());
        assert_eq!(json["error"]["code"], "shutting_down");
    }
}
