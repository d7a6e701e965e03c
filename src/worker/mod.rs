//! Worker pool that executes fetch jobs.
//!
//! # Components
//!
//! - [`Fetcher`]: the outbound GET, returning a [`FetchOutcome`]
//! - [`JobExecutor`]: moves one job `New -> Pending -> Completed | Error`
//! - [`WorkerPool`]: fixed set of tasks looping take -> execute
//!
//! # Execution Flow
//!
//! 1. A worker takes the next job id from the admission queue
//! 2. [`JobExecutor::execute`] marks the job `Pending` and calls the fetcher
//! 3. Status 200 completes the job; any other response or a failure is `Error`
//! 4. The worker loops back to the queue

pub mod executor;
pub mod fetcher;
pub mod pool;

pub use executor::JobExecutor;
pub use fetcher::{FetchFailure, FetchOutcome, Fetcher, HttpFetcher};
pub use pool::WorkerPool;
