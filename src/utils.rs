//! Utility functions for file naming and path resolution

use std::path::{Path, PathBuf};

/// Extensions the fetcher is known to produce, in the order they are probed
pub const CANDIDATE_EXTENSIONS: [&str; 5] = ["mp4", "webm", "mkv", "m4a", "mp3"];

/// Extension assumed when no candidate file exists
pub const FALLBACK_EXTENSION: &str = "mp4";

/// Make a media title safe to use as a file stem
///
/// Every character that is not alphanumeric, a space, `.`, `-` or `_` is
/// replaced with `_`. Length is preserved in characters.
///
/// # Examples
///
/// ```
/// use media_dl::utils::sanitize_title;
///
/// assert_eq!(sanitize_title("AC/DC: Live!"), "AC_DC_ Live_");
/// assert_eq!(sanitize_title("clip_01-final.v2"), "clip_01-final.v2");
/// ```
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Locate the artifact the fetcher wrote for `title` under `download_dir`
///
/// Probes `<sanitized title>.<ext>` for each of [`CANDIDATE_EXTENSIONS`] and
/// returns the first one that exists as a regular file. When none exists the
/// path with [`FALLBACK_EXTENSION`] is returned anyway, since the fetcher
/// reported success.
pub async fn resolve_file_path(download_dir: &Path, title: &str) -> PathBuf {
    let stem = sanitize_title(title);

    for ext in CANDIDATE_EXTENSIONS {
        let candidate = download_dir.join(format!("{stem}.{ext}"));
        if let Ok(metadata) = tokio::fs::metadata(&candidate).await
            && metadata.is_file()
        {
            return candidate;
        }
    }

    download_dir.join(format!("{stem}.{FALLBACK_EXTENSION}"))
}
