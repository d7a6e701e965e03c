use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{FetchqError, Result};
use crate::scheduler::job::{Job, JobId};
use crate::scheduler::queue::AdmissionQueue;
use crate::scheduler::store::SharedJobStore;

/// Producer-side view of the scheduler, shared by API handlers.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    store: SharedJobStore,
    queue: AdmissionQueue,
    /// Serializes submitters so ids enter the queue in the order they were
    /// allocated. Tokio's mutex is fair, so waiters keep their arrival order.
    admission: Arc<Mutex<()>>,
}

impl SchedulerHandle {
    pub fn new(store: SharedJobStore, queue: AdmissionQueue) -> Self {
        Self {
            store,
            queue,
            admission: Arc::new(Mutex::new(())),
        }
    }

    /// Record a new job and hand it to the workers.
    ///
    /// The job is visible in the store before it is enqueued, and the store
    /// lock is released before waiting on a full queue. Submitters are
    /// admitted one at a time, so queue order always matches id order.
    ///
    /// If the returned future is dropped while waiting for a slot (for example
    /// the HTTP client went away), or the queue is closed meanwhile, the job
    /// stays in the store as `New` and is never executed.
    pub async fn submit(&self, url: impl Into<String>) -> Result<JobId> {
        let url = url.into();
        let _admission = self.admission.lock().await;
        if self.queue.is_closed() {
            return Err(FetchqError::QueueClosed);
        }

        let job_id = self.store.write().await.create(url.as_str());
        tracing::info!(job_id, url = %url, "Job submitted");

        self.queue.submit(job_id).await?;
        tracing::debug!(job_id, queued = self.queue.len(), "Job admitted");
        Ok(job_id)
    }

    pub async fn job(&self, id: JobId) -> Option<Job> {
        self.store.read().await.get(id).cloned()
    }

    /// The `limit` most recent jobs, oldest first.
    pub async fn recent(&self, limit: usize) -> Vec<Job> {
        self.store.read().await.recent(limit).to_vec()
    }

    pub fn store(&self) -> &SharedJobStore {
        &self.store
    }

    pub fn queue(&self) -> &AdmissionQueue {
        &self.queue
    }
}
