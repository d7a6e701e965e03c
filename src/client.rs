use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{FetchqError, Result};
use crate::scheduler::{Job, JobId};

#[derive(Deserialize)]
struct SubmitJobResponse {
    id: JobId,
}

/// Client for a running fetchq API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a URL and return the id of the new job.
    ///
    /// Resolves only once the server has admitted the job, which may take a
    /// while if its queue is full.
    pub async fn submit(&self, url: &str) -> Result<JobId> {
        let response = self
            .http
            .post(format!("{}/", self.base_url))
            .json(&json!({ "url": url }))
            .send()
            .await?;
        let submitted: SubmitJobResponse = decode(response.json().await?)?;
        Ok(submitted.id)
    }

    pub async fn job(&self, id: JobId) -> Result<Job> {
        let response = self
            .http
            .get(format!("{}/", self.base_url))
            .query(&[("id", id)])
            .send()
            .await?;
        decode(response.json().await?)
    }

    /// The most recent jobs known to the server, oldest first.
    pub async fn recent(&self) -> Result<Vec<Job>> {
        let response = self
            .http
            .get(format!("{}/", self.base_url))
            .send()
            .await?;
        decode(response.json().await?)
    }
}

/// Turn an `{"error": ...}` payload into [`FetchqError::Api`], anything else
/// into `T`.
fn decode<T: DeserializeOwned>(payload: Value) -> Result<T> {
    if let Some(message) = payload.get("error").and_then(Value::as_str) {
        return Err(FetchqError::Api(message.to_string()));
    }
    serde_json::from_value(payload)
        .map_err(|e| FetchqError::Api(format!("unexpected response: {e}")))
}
