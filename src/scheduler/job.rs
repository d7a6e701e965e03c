use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FetchqError, Result};

pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    New,
    Pending,
    Completed,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }

    fn can_advance_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::New, JobStatus::Pending)
                | (JobStatus::Pending, JobStatus::Completed)
                | (JobStatus::Pending, JobStatus::Error)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::New => write!(f, "New"),
            JobStatus::Pending => write!(f, "Pending"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Error => write!(f, "Error"),
        }
    }
}

/// A single URL fetch and its recorded outcome.
///
/// `id` and `url` are fixed at construction. `status` only moves forward:
/// `New -> Pending -> Completed | Error`, each step exactly once. The response
/// body is kept in memory but never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    url: String,
    status: JobStatus,
    response_status_code: u16,
    response_content_length: u64,
    #[serde(skip)]
    response_body: String,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(id: JobId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            status: JobStatus::New,
            response_status_code: 0,
            response_content_length: 0,
            response_body: String::new(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn response_status_code(&self) -> u16 {
        self.response_status_code
    }

    pub fn response_content_length(&self) -> u64 {
        self.response_content_length
    }

    pub fn response_body(&self) -> &str {
        &self.response_body
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Mark the job as picked up by a worker. Must happen before any I/O.
    pub fn start(&mut self) -> Result<()> {
        self.advance(JobStatus::Pending)
    }

    /// Record a response from the upstream server.
    ///
    /// Only status 200 counts as success; every other code, other 2xx
    /// included, ends the job in `Error` with the response still recorded.
    pub fn record_response(
        &mut self,
        status_code: u16,
        content_length: u64,
        body: String,
    ) -> Result<JobStatus> {
        let next = if status_code == 200 {
            JobStatus::Completed
        } else {
            JobStatus::Error
        };
        self.advance(next)?;
        self.response_status_code = status_code;
        self.response_content_length = content_length;
        self.response_body = body;
        Ok(next)
    }

    /// Record a fetch that never produced a response. Response fields keep
    /// their defaults; the cause is not stored.
    pub fn record_failure(&mut self) -> Result<()> {
        self.advance(JobStatus::Error)
    }

    fn advance(&mut self, next: JobStatus) -> Result<()> {
        if !self.status.can_advance_to(next) {
            return Err(FetchqError::InvalidTransition {
                job_id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        if next.is_terminal() {
            self.completed_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_has_empty_response() {
        let job = Job::new(3, "http://example.com");
        assert_eq!(job.id(), 3);
        assert_eq!(job.url(), "http://example.com");
        assert_eq!(job.status(), JobStatus::New);
        assert_eq!(job.response_status_code(), 0);
        assert_eq!(job.response_content_length(), 0);
        assert!(job.response_body().is_empty());
        assert!(job.completed_at().is_none());
    }

    #[test]
    fn cannot_skip_pending() {
        let mut job = Job::new(0, "http://example.com");
        let err = job.record_response(200, 5, "hello".into()).unwrap_err();
        assert!(matches!(
            err,
            FetchqError::InvalidTransition {
                from: JobStatus::New,
                to: JobStatus::Completed,
                ..
            }
        ));
        assert_eq!(job.status(), JobStatus::New);
        assert!(job.record_failure().is_err());
        assert_eq!(job.status(), JobStatus::New);
    }

    #[test]
    fn cannot_start_twice() {
        let mut job = Job::new(0, "http://example.com");
        job.start().unwrap();
        assert!(job.start().is_err());
        assert_eq!(job.status(), JobStatus::Pending);
    }

    #[test]
    fn terminal_state_is_final() {
        let mut job = Job::new(0, "http://example.com");
        job.start().unwrap();
        job.record_failure().unwrap();
        assert!(job.completed_at().is_some());

        assert!(job.start().is_err());
        assert!(job.record_response(200, 0, String::new()).is_err());
        assert!(job.record_failure().is_err());
        assert_eq!(job.status(), JobStatus::Error);
        assert_eq!(job.response_status_code(), 0);
    }

    #[test]
    fn only_200_completes() {
        for code in [201, 204, 301, 404, 500] {
            let mut job = Job::new(0, "http://example.com");
            job.start().unwrap();
            let status = job.record_response(code, 0, String::new()).unwrap();
            assert_eq!(status, JobStatus::Error, "code {code}");
            assert_eq!(job.response_status_code(), code);
        }
    }

    #[test]
    fn status_display_uses_symbolic_names() {
        assert_eq!(JobStatus::New.to_string(), "New");
        assert_eq!(JobStatus::Pending.to_string(), "Pending");
        assert_eq!(JobStatus::Completed.to_string(), "Completed");
        assert_eq!(JobStatus::Error.to_string(), "Error");
    }
}
