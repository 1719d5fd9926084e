//! CLI-based fetcher using the external yt-dlp binary

use super::traits::{FetchOutcome, MediaFetcher, ProbeOutcome};
use crate::types::Resolution;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Output;
use tokio::process::Command;

/// Map a resolution to a yt-dlp `-f` format selector
///
/// `best` prefers an mp4 video with m4a audio; the other tiers cap the video
/// height.
pub fn format_selector(resolution: Resolution) -> String {
    match resolution.max_height() {
        None => "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best".to_string(),
        Some(height) => format!("bestvideo[height<={height}]+bestaudio/best[height<={height}]"),
    }
}

/// `--replace-in-metadata` arguments that rewrite the title the way
/// [`sanitize_title`](crate::utils::sanitize_title) does, before the output
/// template is expanded
///
/// yt-dlp regexes are Python regexes, where `\w` is letters, digits and `_`.
const TITLE_REWRITE: [&str; 3] = ["title", r"[^\w .\-]", "_"];

/// Fetcher that shells out to `yt-dlp`
///
/// Arguments are passed as an argv vector, so URLs are never interpreted by a
/// shell. Child processes are killed if the calling future is dropped (for
/// example by a timeout). Output files are named after the sanitized title so
/// the runner can find them again with [`resolve_file_path`].
///
/// [`resolve_file_path`]: crate::utils::resolve_file_path
///
/// # Examples
///
/// ```no_run
/// use media_dl::fetcher::CliMediaFetcher;
/// use std::path::PathBuf;
///
/// // Explicit binary
/// let fetcher = CliMediaFetcher::new(PathBuf::from("/usr/bin/yt-dlp"), PathBuf::from("downloads"));
///
/// // Or auto-discover from PATH
/// let fetcher = CliMediaFetcher::from_path(PathBuf::from("downloads"))
///     .expect("yt-dlp not found in PATH");
/// ```
#[derive(Debug, Clone)]
pub struct CliMediaFetcher {
    binary_path: PathBuf,
    download_dir: PathBuf,
}

impl CliMediaFetcher {
    /// Create a fetcher with an explicit binary path
    pub fn new(binary_path: PathBuf, download_dir: PathBuf) -> Self {
        Self {
            binary_path,
            download_dir,
        }
    }

    /// Attempt to find `yt-dlp` in PATH
    pub fn from_path(download_dir: PathBuf) -> Option<Self> {
        which::which("yt-dlp")
            .ok()
            .map(|binary| Self::new(binary, download_dir))
    }

    /// The binary this fetcher runs
    pub fn binary_path(&self) -> &PathBuf {
        &self.binary_path
    }

    fn output_template(&self) -> String {
        self.download_dir
            .join("%(title)s.%(ext)s")
            .to_string_lossy()
            .into_owned()
    }

    async fn run(&self, args: &[&str]) -> std::io::Result<Output> {
        Command::new(&self.binary_path)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
    }
}

/// Trimmed stderr, or the exit status when the tool printed nothing
fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        format!("yt-dlp exited with {}", output.status)
    } else {
        stderr
    }
}

fn spawn_failure(binary: &std::path::Path, e: &std::io::Error) -> String {
    format!("failed to execute {}: {}", binary.display(), e)
}

#[async_trait]
impl MediaFetcher for CliMediaFetcher {
    async fn probe_title(&self, url: &str) -> ProbeOutcome {
        match self
            .run(&["--get-title", "--no-warnings", "--no-playlist", "--", url])
            .await
        {
            Ok(output) if output.status.success() => {
                ProbeOutcome::succeeded(String::from_utf8_lossy(&output.stdout).trim())
            }
            Ok(output) => ProbeOutcome::failed(error_text(&output)),
            Err(e) => ProbeOutcome::failed(spawn_failure(&self.binary_path, &e)),
        }
    }

    async fn fetch_media(&self, url: &str, resolution: Resolution) -> FetchOutcome {
        let selector = format_selector(resolution);
        let template = self.output_template();
        match self
            .run(&[
                "-f",
                &selector,
                "-o",
                &template,
                "--replace-in-metadata",
                TITLE_REWRITE[0],
                TITLE_REWRITE[1],
                TITLE_REWRITE[2],
                "--no-playlist",
                "--no-progress",
                "--",
                url,
            ])
            .await
        {
            Ok(output) if output.status.success() => FetchOutcome::succeeded(),
            Ok(output) => FetchOutcome::failed(error_text(&output)),
            Err(e) => FetchOutcome::failed(spawn_failure(&self.binary_path, &e)),
        }
    }

    fn name(&self) -> &'static str {
        "cli-yt-dlp"
    }
}
