use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::error::{FetchqError, Result};
use crate::scheduler::job::JobId;

/// Bounded FIFO of job ids waiting for a worker.
///
/// Backed by a bounded mpsc channel: senders that find the queue full wait for
/// a slot in the order they arrived, and a slot is only freed once a worker has
/// taken an item. The receiver is shared between workers behind a fair mutex,
/// so idle workers are also served in arrival order.
///
/// Closing the queue turns away waiting and later submissions with
/// [`FetchqError::QueueClosed`]; jobs already queued can still be taken.
#[derive(Debug, Clone)]
pub struct AdmissionQueue {
    tx: mpsc::Sender<JobId>,
    rx: Arc<Mutex<mpsc::Receiver<JobId>>>,
    capacity: usize,
    closed: CancellationToken,
}

impl AdmissionQueue {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(FetchqError::InvalidConfig(
                "admission queue capacity must be at least 1".to_string(),
            ));
        }
        let (tx, rx) = mpsc::channel(capacity);
        Ok(Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
            capacity,
            closed: CancellationToken::new(),
        })
    }

    /// Enqueue a job, waiting for a free slot while the queue is full.
    pub async fn submit(&self, job_id: JobId) -> Result<()> {
        tokio::select! {
            biased;
            _ = self.closed.cancelled() => Err(FetchqError::QueueClosed),
            sent = self.tx.send(job_id) => sent.map_err(|_| FetchqError::QueueClosed),
        }
    }

    /// Stop admitting jobs. Idempotent.
    pub fn close(&self) {
        if !self.closed.is_cancelled() {
            tracing::info!(queued = self.len(), "Admission queue closed");
        }
        self.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Dequeue the oldest job, waiting while the queue is empty.
    ///
    /// Cancel safe: dropping the future before it resolves loses no item.
    /// Returns `None` only if the queue can never yield again.
    pub async fn take(&self) -> Option<JobId> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    /// Number of jobs currently waiting.
    pub fn len(&self) -> usize {
        self.capacity - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.tx.capacity() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
