use std::time::Instant;

use crate::error::{FetchqError, Result};
use crate::scheduler::{JobId, JobStatus, SharedJobStore};
use crate::worker::fetcher::{FetchOutcome, Fetcher};

/// Drives one job through its state machine.
///
/// The job is marked `Pending` before the fetch starts and receives its
/// terminal status once the fetch resolves. The store lock is never held
/// across the fetch.
#[derive(Debug)]
pub struct JobExecutor<F> {
    fetcher: F,
    store: SharedJobStore,
}

impl<F: Fetcher> JobExecutor<F> {
    pub fn new(fetcher: F, store: SharedJobStore) -> Self {
        Self { fetcher, store }
    }

    /// Execute a job and return its terminal status
    pub async fn execute(&self, job_id: JobId) -> Result<JobStatus> {
        let url = {
            let mut store = self.store.write().await;
            let job = store
                .get_mut(job_id)
                .ok_or(FetchqError::JobNotFound(job_id))?;
            job.start()?;
            job.url().to_string()
        };

        tracing::info!(job_id, url = %url, "Executing job");
        let started = Instant::now();
        let outcome = self.fetcher.fetch(&url).await;

        let mut store = self.store.write().await;
        let job = store
            .get_mut(job_id)
            .ok_or(FetchqError::JobNotFound(job_id))?;

        match outcome {
            FetchOutcome::Success {
                status_code,
                content_length,
                body,
            } => {
                let status = job.record_response(status_code, content_length, body)?;
                tracing::info!(
                    job_id,
                    status = %status,
                    status_code,
                    content_length,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Job finished"
                );
                Ok(status)
            }
            FetchOutcome::Failure { cause } => {
                job.record_failure()?;
                tracing::warn!(job_id, url = %url, error = %cause, "Job fetch failed");
                Ok(JobStatus::Error)
            }
        }
    }
}
