use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::api::{self, ApiState};
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::scheduler::{AdmissionQueue, JobStore, SchedulerHandle};
use crate::worker::{Fetcher, JobExecutor, WorkerPool};

/// Wires the job store, admission queue, worker pool and API together.
pub struct FetchService<F> {
    config: ServiceConfig,
    scheduler: SchedulerHandle,
    fetcher: F,
}

impl<F: Fetcher> FetchService<F> {
    pub fn new(config: ServiceConfig, fetcher: F) -> Result<Self> {
        config.validate()?;
        let queue = AdmissionQueue::new(config.queue_capacity)?;
        let scheduler = SchedulerHandle::new(JobStore::shared(), queue);

        Ok(Self {
            config,
            scheduler,
            fetcher,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }

    /// Bind the configured address and run until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let listener = TcpListener::bind(self.config.listen_addr).await?;
        self.run_with_listener(listener, shutdown).await
    }

    /// Run the service on an already bound listener.
    ///
    /// 1. Spawns the worker pool on the admission queue
    /// 2. Serves the API until `shutdown` is cancelled and open requests finish
    /// 3. Stops the pool, letting workers finish their current job within the
    ///    grace period
    ///
    /// Once `shutdown` fires the admission queue is closed: submissions still
    /// waiting for a slot, and any that arrive later, are answered with 503.
    /// Jobs left in the queue once the pool stops are never executed.
    pub async fn run_with_listener(
        self,
        listener: TcpListener,
        shutdown: CancellationToken,
    ) -> Result<()> {
        let executor = JobExecutor::new(self.fetcher, self.scheduler.store().clone());
        let pool = WorkerPool::spawn(
            self.config.workers,
            self.scheduler.queue().clone(),
            executor,
            CancellationToken::new(),
        );

        let state = ApiState {
            scheduler: self.scheduler.clone(),
            list_limit: self.config.list_limit,
        };
        let served = api::serve(listener, state, shutdown.clone()).await;
        if let Err(e) = &served {
            tracing::error!(error = %e, "API server failed");
        }

        pool.shutdown(self.config.shutdown_grace).await;
        served?;
        Ok(())
    }
}
