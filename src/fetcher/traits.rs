//! Traits and types for the external media fetcher

use crate::types::Resolution;
use async_trait::async_trait;

/// Result of a title probe
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Whether the tool exited successfully
    pub success: bool,
    /// Captured title (trimmed stdout), empty on failure
    pub title: String,
    /// Captured error text (trimmed stderr), empty on success
    pub error_text: String,
}

impl ProbeOutcome {
    /// Successful probe with the given title
    pub fn succeeded(title: impl Into<String>) -> Self {
        Self {
            success: true,
            title: title.into(),
            error_text: String::new(),
        }
    }

    /// Failed probe with the given error text
    pub fn failed(error_text: impl Into<String>) -> Self {
        Self {
            success: false,
            title: String::new(),
            error_text: error_text.into(),
        }
    }
}

/// Result of a content fetch
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Whether the tool exited successfully
    pub success: bool,
    /// Captured error text (trimmed stderr), empty on success
    pub error_text: String,
}

impl FetchOutcome {
    /// Successful fetch
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error_text: String::new(),
        }
    }

    /// Failed fetch with the given error text
    pub fn failed(error_text: impl Into<String>) -> Self {
        Self {
            success: false,
            error_text: error_text.into(),
        }
    }
}

/// Interface to the external media-retrieval tool
///
/// Failures are reported in the outcome, never as `Err`: the job runner records
/// them on the job and moves on. Implementations write fetched content into
/// their configured download directory using the media title as the base file
/// name; the extension is chosen by the tool.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Look up the media title for `url` without downloading it
    async fn probe_title(&self, url: &str) -> ProbeOutcome;

    /// Download `url` at the requested resolution
    async fn fetch_media(&self, url: &str, resolution: Resolution) -> FetchOutcome;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
