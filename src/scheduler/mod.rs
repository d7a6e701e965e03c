//! Job bookkeeping and admission control.
//!
//! - [`Job`]: one URL fetch and its outcome, guarded by a forward-only state machine
//! - [`JobStore`]: append-only index of every submitted job, in submission order
//! - [`AdmissionQueue`]: bounded FIFO of job ids waiting for a worker
//! - [`SchedulerHandle`]: the producer side used by the API (store, then enqueue)

pub mod handle;
pub mod job;
pub mod queue;
pub mod store;

pub use handle::SchedulerHandle;
pub use job::{Job, JobId, JobStatus};
pub use queue::AdmissionQueue;
pub use store::{JobStore, SharedJobStore};
