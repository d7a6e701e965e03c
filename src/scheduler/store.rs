use std::sync::Arc;

use tokio::sync::RwLock;

use crate::scheduler::job::{Job, JobId};

pub type SharedJobStore = Arc<RwLock<JobStore>>;

/// Append-only record of every submitted job.
///
/// Ids are handed out densely from 0, so a job's id is also its position and
/// lookups are O(1). Nothing is ever evicted: the store grows for the lifetime
/// of the process.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: Vec<Job>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedJobStore {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Create a job in state `New` and return its id.
    pub fn create(&mut self, url: impl Into<String>) -> JobId {
        let id = self.jobs.len() as JobId;
        self.jobs.push(Job::new(id, url));
        id
    }

    /// Get a job by ID
    pub fn get(&self, id: JobId) -> Option<&Job> {
        usize::try_from(id).ok().and_then(|idx| self.jobs.get(idx))
    }

    /// Get a mutable reference to a job by ID
    pub fn get_mut(&mut self, id: JobId) -> Option<&mut Job> {
        usize::try_from(id).ok().and_then(|idx| self.jobs.get_mut(idx))
    }

    /// The `limit` most recently submitted jobs, oldest first.
    pub fn recent(&self, limit: usize) -> &[Job] {
        let start = self.jobs.len().saturating_sub(limit);
        &self.jobs[start..]
    }

    /// All jobs in submission order
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
