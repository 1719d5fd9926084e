//! External media fetcher adapter
//!
//! The job runner never talks to yt-dlp directly. It goes through the
//! [`MediaFetcher`] trait, which has two operations:
//!
//! - [`MediaFetcher::probe_title`] looks up the media title without downloading
//! - [`MediaFetcher::fetch_media`] downloads the content at a requested resolution
//!
//! Implementations:
//!
//! - [`CliMediaFetcher`]: runs the external `yt-dlp` binary
//! - [`NoOpMediaFetcher`]: used when no binary is available; every call fails
//!
//! ## Usage
//!
//! ```no_run
//! use media_dl::fetcher::{CliMediaFetcher, MediaFetcher};
//! use media_dl::types::Resolution;
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() {
//!     let fetcher = CliMediaFetcher::from_path(PathBuf::from("downloads"))
//!         .expect("yt-dlp not found");
//!
//!     let probe = fetcher.probe_title("https://example.com/watch?v=abc").await;
//!     if probe.success {
//!         let fetched = fetcher
//!             .fetch_media("https://example.com/watch?v=abc", Resolution::Hd)
//!             .await;
//!         println!("{} downloaded: {}", probe.title, fetched.success);
//!     }
//! }
//! ```

mod cli;
mod noop;
mod traits;

pub use cli::{CliMediaFetcher, format_selector};
pub use noop::NoOpMediaFetcher;
pub use traits::{FetchOutcome, MediaFetcher, ProbeOutcome};
