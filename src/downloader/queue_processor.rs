//! Queue processor - pops queued jobs and runs them under the concurrency limit.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use super::MediaDownloader;
use super::job_task::{JobTaskContext, run_job_task};

/// Interval between queue polling attempts when the queue is empty
const QUEUE_POLL_INTERVAL: Duration = Duration::from_millis(100);

impl MediaDownloader {
    /// Start the queue processor task
    ///
    /// This method spawns a background task that continuously:
    /// 1. Acquires a permit from the concurrency limiter (respects max_concurrent_downloads)
    /// 2. Takes the oldest job from the queue
    /// 3. Spawns a job task holding that permit until the job reaches a terminal phase
    /// 4. Repeats until shutdown
    ///
    /// At most `max_concurrent_downloads` jobs are in flight at any instant. A
    /// job stays in the queue until a worker is free for it, so every job not
    /// yet running counts against `max_queue_depth`.
    /// Once shutdown begins no further jobs are started; jobs still queued stay
    /// `pending` in the snapshot and are picked up again on the next start.
    pub fn start_queue_processor(&self) -> tokio::task::JoinHandle<()> {
        let queue = self.queue_state.queue.clone();
        let concurrent_limit = self.queue_state.concurrent_limit.clone();
        let active_jobs = self.queue_state.active_jobs.clone();
        let accepting_new = self.queue_state.accepting_new.clone();
        let downloader = self.clone();

        tokio::spawn(async move {
            loop {
                if !accepting_new.load(Ordering::SeqCst) {
                    tracing::info!("Queue processor stopping, shutdown in progress");
                    break;
                }

                // Blocks while max_concurrent_downloads jobs are running
                let Ok(permit) = concurrent_limit.clone().acquire_owned().await else {
                    tracing::warn!("Concurrency limiter closed, queue processor stopping");
                    break;
                };

                let next = {
                    let mut queue_guard = queue.lock().await;
                    queue_guard.pop_front()
                };

                let Some(id) = next else {
                    // Queue is empty, release the slot and check again shortly
                    drop(permit);
                    tokio::time::sleep(QUEUE_POLL_INTERVAL).await;
                    continue;
                };

                active_jobs.lock().await.insert(id);

                // Shutdown may have started while waiting for the permit
                if !accepting_new.load(Ordering::SeqCst) {
                    active_jobs.lock().await.remove(&id);
                    queue.lock().await.push_front(id);
                    tracing::info!("Queue processor stopping, shutdown in progress");
                    break;
                }

                let ctx = JobTaskContext {
                    id,
                    store: Arc::clone(&downloader.store),
                    fetcher: Arc::clone(&downloader.fetcher),
                    config: Arc::clone(&downloader.config),
                    active_jobs: Arc::clone(&active_jobs),
                    downloader: downloader.clone(),
                };

                tokio::spawn(async move {
                    let _permit = permit;
                    run_job_task(ctx).await;
                });
            }
        })
    }
}
