//! Core types for media-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique identifier for a download job
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    /// Generate a fresh random job ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID value
    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for JobId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Quality tier used to pick the fetcher's format selection strategy
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Up to 360p
    Low,
    /// Up to 480p
    #[default]
    Medium,
    /// Up to 720p
    High,
    /// Up to 1080p
    Hd,
    /// Best available, preferring an mp4/m4a pairing
    Best,
}

impl Resolution {
    /// Every resolution, in ascending quality order
    pub const ALL: [Resolution; 5] = [
        Resolution::Low,
        Resolution::Medium,
        Resolution::High,
        Resolution::Hd,
        Resolution::Best,
    ];

    /// Wire name of the resolution
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Low => "low",
            Resolution::Medium => "medium",
            Resolution::High => "high",
            Resolution::Hd => "hd",
            Resolution::Best => "best",
        }
    }

    /// Height cap in pixels, `None` for [`Resolution::Best`]
    pub fn max_height(&self) -> Option<u32> {
        match self {
            Resolution::Low => Some(360),
            Resolution::Medium => Some(480),
            Resolution::High => Some(720),
            Resolution::Hd => Some(1080),
            Resolution::Best => None,
        }
    }

    /// Parse a requested resolution, falling back to `default` when the value
    /// is absent or not one of the known names
    pub fn coerce(requested: Option<&str>, default: Resolution) -> Resolution {
        requested
            .and_then(|r| r.parse().ok())
            .unwrap_or(default)
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known [`Resolution`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resolution: {0}")]
pub struct UnknownResolution(pub String);

impl std::str::FromStr for Resolution {
    type Err = UnknownResolution;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Resolution::Low),
            "medium" => Ok(Resolution::Medium),
            "high" => Ok(Resolution::High),
            "hd" => Ok(Resolution::Hd),
            "best" => Ok(Resolution::Best),
            _ => Err(UnknownResolution(s.to_string())),
        }
    }
}

/// Position of a job in the Pending → Probing → Fetching → Done|Failed workflow
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Submitted, waiting for a worker
    Pending,
    /// Looking up the media title
    Probing,
    /// Downloading the media content
    Fetching,
    /// Downloaded successfully
    Done,
    /// Probe or fetch failed
    Failed,
}

impl Phase {
    /// Whether the phase is final (`Done` or `Failed`)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }

    /// Wire name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Pending => "pending",
            Phase::Probing => "probing",
            Phase::Fetching => "fetching",
            Phase::Done => "done",
            Phase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submitted download request and its tracked lifecycle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// Job ID
    pub id: JobId,
    /// Source URL
    pub url: String,
    /// Requested quality tier
    pub resolution: Resolution,
    /// Probed media title (empty until the probe succeeds)
    #[serde(default)]
    pub title: String,
    /// Downloaded artifact (empty until the fetch succeeds)
    #[serde(default)]
    #[schema(value_type = String)]
    pub file_path: PathBuf,
    /// Current phase
    pub phase: Phase,
    /// Captured error text (empty unless failed)
    #[serde(default)]
    pub error_detail: String,
    /// When the job was submitted
    pub submitted_at: DateTime<Utc>,
    /// When a worker began probing
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached `done`
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    /// When the job reached `failed`
    #[serde(default)]
    pub failed_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    /// Create a pending record with a fresh ID
    pub fn new(url: impl Into<String>, resolution: Resolution) -> Self {
        Self {
            id: JobId::new(),
            url: url.into(),
            resolution,
            title: String::new(),
            file_path: PathBuf::new(),
            phase: Phase::Pending,
            error_detail: String::new(),
            submitted_at: Utc::now(),
            started_at: None,
            ended_at: None,
            failed_at: None,
        }
    }

    /// Whether the job reached `Done` or `Failed`
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Enter the probe phase. Returns false if the job already finished.
    pub fn begin_probe(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.phase = Phase::Probing;
        self.started_at.get_or_insert(now);
        true
    }

    /// Enter the fetch phase with the probed title
    pub fn begin_fetch(&mut self, title: impl Into<String>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.title = title.into();
        self.phase = Phase::Fetching;
        true
    }

    /// Mark the job done. No-op (returns false) once terminal.
    pub fn complete(&mut self, file_path: PathBuf, now: DateTime<Utc>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.phase = Phase::Done;
        self.file_path = file_path;
        self.error_detail.clear();
        self.ended_at = Some(now);
        true
    }

    /// Mark the job failed. No-op (returns false) once terminal.
    pub fn fail(&mut self, error_detail: impl Into<String>, now: DateTime<Utc>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.phase = Phase::Failed;
        self.file_path = PathBuf::new();
        self.error_detail = error_detail.into();
        self.failed_at = Some(now);
        true
    }
}

/// Default resolution plus every accepted resolution name
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResolutionOptions {
    /// Resolution applied when none (or an unknown one) is requested
    pub default: Resolution,
    /// All accepted resolutions
    pub options: Vec<Resolution>,
}

/// Event emitted during the job lifecycle
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Job accepted and queued
    Queued {
        /// Job ID
        id: JobId,
        /// Source URL
        url: String,
    },

    /// Title probe started
    Probing {
        /// Job ID
        id: JobId,
    },

    /// Title probe succeeded
    Probed {
        /// Job ID
        id: JobId,
        /// Probed title
        title: String,
    },

    /// Content fetch started
    Fetching {
        /// Job ID
        id: JobId,
        /// Requested resolution
        resolution: Resolution,
    },

    /// Job finished successfully
    Complete {
        /// Job ID
        id: JobId,
        /// Resolved artifact path
        #[schema(value_type = String)]
        path: PathBuf,
    },

    /// Job failed
    Failed {
        /// Job ID
        id: JobId,
        /// Phase in which the failure happened
        phase: Phase,
        /// Captured error text
        error: String,
    },

    /// All job records were removed
    HistoryCleared {
        /// Number of records removed
        count: usize,
    },

    /// Download directory was purged
    FilesPurged {
        /// Number of top-level entries removed
        count: usize,
    },

    /// Downloader is shutting down
    Shutdown,
}
