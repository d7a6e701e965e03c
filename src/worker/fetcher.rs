use std::future::Future;

use reqwest::header::CONTENT_LENGTH;
use reqwest::Client;
use thiserror::Error;

use crate::config::FetchConfig;
use crate::error::Result;

/// Why a fetch produced no response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Result of one GET against a job's URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The server answered, with any status code.
    Success {
        status_code: u16,
        content_length: u64,
        body: String,
    },
    /// No usable response.
    Failure { cause: FetchFailure },
}

/// Performs the outbound request for a job.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchOutcome> + Send;
}

/// [`Fetcher`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> std::result::Result<FetchOutcome, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status_code = response.status().as_u16();
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);
        let body = response.text().await?;

        Ok(FetchOutcome::Success {
            status_code,
            content_length,
            body,
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        match self.get(url).await {
            Ok(outcome) => outcome,
            Err(e) => FetchOutcome::Failure {
                cause: classify(&e),
            },
        }
    }
}

fn classify(err: &reqwest::Error) -> FetchFailure {
    if err.is_timeout() {
        FetchFailure::Timeout
    } else if err.is_builder() {
        FetchFailure::InvalidUrl(err.to_string())
    } else if err.is_connect() {
        FetchFailure::Connect(err.to_string())
    } else if err.is_body() || err.is_decode() {
        FetchFailure::Body(err.to_string())
    } else {
        FetchFailure::Request(err.to_string())
    }
}
