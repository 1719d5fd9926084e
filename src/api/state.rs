//! Application state for the API server

use crate::MediaDownloader;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone). Router-level settings such as
/// CORS and Swagger UI are read once in [`create_router`](super::create_router)
/// and are not part of the per-request state.
#[derive(Clone)]
pub struct AppState {
    /// The main MediaDownloader instance
    pub downloader: Arc<MediaDownloader>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(downloader: Arc<MediaDownloader>) -> Self {
        Self { downloader }
    }
}
