//! Job task - the probe-then-fetch lifecycle of a single job.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::fetcher::MediaFetcher;
use crate::store::JobStore;
use crate::types::{Event, JobId, JobRecord, Phase};
use crate::utils::resolve_file_path;

use super::MediaDownloader;

/// Error text recorded when a probe succeeds but yields no title
pub(crate) const EMPTY_TITLE: &str = "empty title returned by fetcher";

/// Everything a job task needs, cloned out of the downloader by the queue processor
pub(crate) struct JobTaskContext {
    pub(crate) id: JobId,
    pub(crate) store: Arc<JobStore>,
    pub(crate) fetcher: Arc<dyn MediaFetcher>,
    pub(crate) config: Arc<Config>,
    pub(crate) active_jobs: Arc<Mutex<HashSet<JobId>>>,
    pub(crate) downloader: MediaDownloader,
}

impl JobTaskContext {
    async fn remove_from_active(&self) {
        self.active_jobs.lock().await.remove(&self.id);
    }

    /// Record a failure in `phase` and emit the matching event
    async fn mark_failed(&self, phase: Phase, error: String) {
        let now = Utc::now();
        let applied = self
            .store
            .update(self.id, |r| r.fail(error.clone(), now))
            .await
            .unwrap_or(false);

        if applied {
            tracing::warn!(job_id = %self.id, ?phase, error = %error, "Job failed");
            self.downloader.emit_event(Event::Failed {
                id: self.id,
                phase,
                error,
            });
        }
    }

    /// Run an external call, bounded by `tool_timeout` when one is configured
    ///
    /// Dropping the future on timeout kills the child process.
    async fn bounded<T>(&self, operation: &str, call: impl Future<Output = T>) -> Result<T, String> {
        match self.config.download.tool_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                format!("{operation} timed out after {limit:?}")
            }),
            None => Ok(call.await),
        }
    }
}

/// Core job task -- executes one job from `pending` to a terminal phase.
///
/// Phases:
/// 1. Enter `probing` and look up the title
/// 2. Enter `fetching` with the title and download the media
/// 3. Resolve the artifact path and mark the job `done`
///
/// Any failure records the captured error text and stops; nothing is retried.
/// The store lock is only held for the record updates, never across a
/// fetcher call.
pub(crate) async fn run_job_task(ctx: JobTaskContext) {
    run_phases(&ctx).await;
    ctx.remove_from_active().await;
}

async fn run_phases(ctx: &JobTaskContext) {
    let id = ctx.id;

    // Phase 1: probe
    let Some(record) = begin_probe(ctx).await else {
        return;
    };
    ctx.downloader.emit_event(Event::Probing { id });
    tracing::debug!(job_id = %id, url = %record.url, "Probing title");

    let probe = match ctx
        .bounded("probe", ctx.fetcher.probe_title(&record.url))
        .await
    {
        Ok(outcome) => outcome,
        Err(timeout) => {
            ctx.mark_failed(Phase::Probing, timeout).await;
            return;
        }
    };

    if !probe.success {
        ctx.mark_failed(Phase::Probing, probe.error_text).await;
        return;
    }
    if probe.title.trim().is_empty() {
        ctx.mark_failed(Phase::Probing, EMPTY_TITLE.to_string()).await;
        return;
    }

    let title = probe.title;
    ctx.downloader.emit_event(Event::Probed {
        id,
        title: title.clone(),
    });

    // Phase 2: fetch
    let entered = ctx
        .store
        .update(id, |r| r.begin_fetch(title.clone()))
        .await
        .unwrap_or(false);
    if !entered {
        tracing::debug!(job_id = %id, "Job record gone or finished before fetch, stopping");
        return;
    }
    ctx.downloader.emit_event(Event::Fetching {
        id,
        resolution: record.resolution,
    });
    tracing::debug!(job_id = %id, title = %title, resolution = %record.resolution, "Fetching media");

    let fetched = match ctx
        .bounded(
            "fetch",
            ctx.fetcher.fetch_media(&record.url, record.resolution),
        )
        .await
    {
        Ok(outcome) => outcome,
        Err(timeout) => {
            ctx.mark_failed(Phase::Fetching, timeout).await;
            return;
        }
    };

    if !fetched.success {
        ctx.mark_failed(Phase::Fetching, fetched.error_text).await;
        return;
    }

    // Phase 3: locate the artifact and finish
    let path = resolve_file_path(&ctx.config.download.download_dir, &title).await;
    let now = Utc::now();
    let completed = ctx
        .store
        .update(id, |r| r.complete(path.clone(), now))
        .await
        .unwrap_or(false);

    if completed {
        tracing::info!(job_id = %id, title = %title, path = %path.display(), "Job complete");
        ctx.downloader.emit_event(Event::Complete { id, path });
    }
}

/// Move the record into `probing`, returning a copy of it
///
/// Returns `None` if the record no longer exists (history was cleared) or
/// already reached a terminal phase.
async fn begin_probe(ctx: &JobTaskContext) -> Option<JobRecord> {
    let now = Utc::now();
    let record = ctx
        .store
        .update(ctx.id, |r| r.begin_probe(now).then(|| r.clone()))
        .await;

    match record {
        Some(Some(record)) => Some(record),
        Some(None) => {
            tracing::debug!(job_id = %ctx.id, "Job already finished, skipping");
            None
        }
        None => {
            tracing::warn!(job_id = %ctx.id, "Queued job no longer in store, skipping");
            None
        }
    }
}
