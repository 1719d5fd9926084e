//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`jobs`] - Submission, status and resolution options
//! - [`history`] - Clearing the job table
//! - [`files`] - Purging the download directory
//! - [`status_page`] - HTML status list
//! - [`system`] - Health, events, OpenAPI

use crate::types::{JobId, Resolution};
use serde::{Deserialize, Serialize};

mod files;
mod history;
mod jobs;
mod status_page;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use files::*;
pub use history::*;
pub use jobs::*;
pub use status_page::*;
pub use system::*;

// ============================================================================
// Request/Response Types (shared across handlers)
// ============================================================================

/// Request body for POST /download
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct DownloadRequest {
    /// Media URL (http or https)
    #[serde(default)]
    pub url: Option<String>,
    /// Requested resolution; unknown or missing values use the configured default
    #[serde(default)]
    pub resolution: Option<String>,
}

/// Response for POST /download
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadAccepted {
    /// ID to poll with GET /status/{id}
    pub download_id: JobId,
    /// Resolution the job will be fetched at
    pub resolution: Resolution,
    /// Human-readable confirmation
    pub message: String,
}

/// Response for DELETE /history
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ClearHistoryResponse {
    /// Number of job records removed
    pub cleared: usize,
}

/// Response for POST /purge
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PurgeResponse {
    /// Number of top-level entries removed from the download directory
    pub removed: usize,
}
