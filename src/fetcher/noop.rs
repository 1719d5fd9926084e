//! No-op fetcher for graceful degradation

use super::traits::{FetchOutcome, MediaFetcher, ProbeOutcome};
use crate::types::Resolution;
use async_trait::async_trait;

/// Error text recorded on jobs when no fetcher binary is available
pub(crate) const UNAVAILABLE: &str = "no media fetcher available";

/// Fetcher used when yt-dlp is neither configured nor found in PATH
///
/// Submissions are still accepted and tracked; every job fails at the probe
/// phase with a clear error instead of the downloader refusing to start.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMediaFetcher;

#[async_trait]
impl MediaFetcher for NoOpMediaFetcher {
    async fn probe_title(&self, _url: &str) -> ProbeOutcome {
        ProbeOutcome::failed(UNAVAILABLE)
    }

    async fn fetch_media(&self, _url: &str, _resolution: Resolution) -> FetchOutcome {
        FetchOutcome::failed(UNAVAILABLE)
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
