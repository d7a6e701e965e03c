use thiserror::Error;

use crate::scheduler::{JobId, JobStatus};

#[derive(Error, Debug)]
pub enum FetchqError {
    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    #[error("Invalid status transition for job {job_id}: {from} -> {to}")]
    InvalidTransition {
        job_id: JobId,
        from: JobStatus,
        to: JobStatus,
    },

    #[error("Admission queue is closed")]
    QueueClosed,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server returned an error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, FetchqError>;
