use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{FetchqError, Result};

/// Jobs that may wait in the admission queue before submissions stall.
pub const DEFAULT_QUEUE_CAPACITY: usize = 4;
/// Concurrent fetch workers.
pub const DEFAULT_WORKER_COUNT: usize = 4;
/// Jobs returned by an unfiltered listing.
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Configuration for outbound fetches.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Total time allowed for one fetch, body included
    pub timeout: Duration,
    /// User-Agent header sent upstream
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            user_agent: concat!("fetchq/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen_addr: SocketAddr,
    pub queue_capacity: usize,
    pub workers: usize,
    pub list_limit: usize,
    /// How long shutdown waits for in-flight fetches before aborting workers
    pub shutdown_grace: Duration,
    pub fetch: FetchConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            workers: DEFAULT_WORKER_COUNT,
            list_limit: DEFAULT_LIST_LIMIT,
            shutdown_grace: Duration::from_secs(10),
            fetch: FetchConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(FetchqError::InvalidConfig(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(FetchqError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.list_limit == 0 {
            return Err(FetchqError::InvalidConfig(
                "list limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_config_default() {
        let cfg = FetchConfig::default();
        assert_eq!(cfg.timeout, Duration::from_secs(300));
        assert!(cfg.user_agent.starts_with("fetchq/"));
    }

    #[test]
    fn service_config_default() {
        let cfg = ServiceConfig::default();
        assert_eq!(cfg.listen_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.queue_capacity, 4);
        assert_eq!(cfg.workers, 4);
        assert_eq!(cfg.list_limit, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn service_config_new() {
        let addr: SocketAddr = "10.0.0.1:9000".parse().unwrap();
        let cfg = ServiceConfig::new(addr);
        assert_eq!(cfg.listen_addr, addr);
        assert_eq!(cfg.workers, DEFAULT_WORKER_COUNT);
    }

    #[test]
    fn service_config_builders() {
        let cfg = ServiceConfig::default()
            .with_queue_capacity(16)
            .with_workers(2)
            .with_list_limit(5)
            .with_fetch_timeout(Duration::from_secs(3));
        assert_eq!(cfg.queue_capacity, 16);
        assert_eq!(cfg.workers, 2);
        assert_eq!(cfg.list_limit, 5);
        assert_eq!(cfg.fetch.timeout, Duration::from_secs(3));
    }

    #[test]
    fn validate_rejects_zero_sizes() {
        let base = ServiceConfig::default();
        assert!(matches!(
            base.clone().with_queue_capacity(0).validate(),
            Err(FetchqError::InvalidConfig(_))
        ));
        assert!(matches!(
            base.clone().with_workers(0).validate(),
            Err(FetchqError::InvalidConfig(_))
        ));
        assert!(matches!(
            base.with_list_limit(0).validate(),
            Err(FetchqError::InvalidConfig(_))
        ));
    }
}
