use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::scheduler::AdmissionQueue;
use crate::worker::executor::JobExecutor;
use crate::worker::fetcher::Fetcher;

/// Fixed set of workers draining the admission queue.
pub struct WorkerPool {
    workers: JoinSet<()>,
    shutdown: CancellationToken,
}

impl WorkerPool {
    /// Spawn `count` workers. They run until `shutdown` is cancelled.
    pub fn spawn<F: Fetcher>(
        count: usize,
        queue: AdmissionQueue,
        executor: JobExecutor<F>,
        shutdown: CancellationToken,
    ) -> Self {
        let executor = Arc::new(executor);
        let mut workers = JoinSet::new();

        for worker_id in 0..count {
            let queue = queue.clone();
            let executor = executor.clone();
            let token = shutdown.clone();
            workers.spawn(async move {
                worker_loop(worker_id, queue, executor, token).await;
            });
        }
        tracing::info!(workers = count, capacity = queue.capacity(), "Worker pool started");

        Self { workers, shutdown }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Cancel the pool and wait for in-flight jobs, aborting whatever is
    /// still running after `grace`.
    pub async fn shutdown(mut self, grace: Duration) {
        self.shutdown.cancel();

        let drained = tokio::time::timeout(grace, async {
            while let Some(result) = self.workers.join_next().await {
                if let Err(e) = result {
                    tracing::error!(error = %e, "Worker task ended abnormally");
                }
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                remaining = self.workers.len(),
                "Shutdown grace period elapsed, aborting workers"
            );
            self.workers.shutdown().await;
        }
        tracing::info!("Worker pool stopped");
    }
}

/// Take a job, run it, repeat. A failing job never ends the loop.
async fn worker_loop<F: Fetcher>(
    worker_id: usize,
    queue: AdmissionQueue,
    executor: Arc<JobExecutor<F>>,
    shutdown: CancellationToken,
) {
    tracing::debug!(worker_id, "Worker started");

    loop {
        let job_id = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            next = queue.take() => match next {
                Some(job_id) => job_id,
                None => break,
            },
        };

        tracing::debug!(worker_id, job_id, "Job taken");
        if let Err(e) = executor.execute(job_id).await {
            tracing::error!(worker_id, job_id, error = %e, "Job execution failed");
        }
    }

    tracing::debug!(worker_id, "Worker stopped");
}
