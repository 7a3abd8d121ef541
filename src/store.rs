//! Storage collaborator interface and the in-memory reference backend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::job::Job;

/// Record store keyed by job id. The lifecycle controller persists every
/// status transition through this seam before proceeding.
pub trait JobStore {
    async fn load(&self, job_id: &str) -> Result<Option<Job>, StoreError>;
    async fn save(&self, job: &Job) -> Result<(), StoreError>;
}

/// In-memory job store.
///
/// A cloneable handle over shared state; keeps the engine exercisable
/// without a database and doubles as the test backend.
#[derive(Clone, Default)]
pub struct MemoryStore {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit-side helper: register a freshly created job.
    pub async fn insert(&self, job: Job) {
        self.jobs.write().await.insert(job.id.clone(), job);
    }
}

impl JobStore for MemoryStore {
    async fn load(&self, job_id: &str) -> Result<Option<Job>, StoreError> {
        Ok(self.jobs.read().await.get(job_id).cloned())
    }

    async fn save(&self, job: &Job) -> Result<(), StoreError> {
        self.jobs.write().await.insert(job.id.clone(), job.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{JobStatus, Priority};

    #[tokio::test]
    async fn load_missing_job_returns_none() {
        let store = MemoryStore::new();
        assert!(store.load("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_then_load_roundtrip() {
        let store = MemoryStore::new();
        let job = Job::new("Batch render", "CAISO_NORTH", Priority::Low, 1.0);
        let id = job.id.clone();
        store.insert(job).await;

        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Batch render");
        assert_eq!(loaded.status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn save_overwrites_existing_record() {
        let store = MemoryStore::new();
        let mut job = Job::new("Batch render", "CAISO_NORTH", Priority::Low, 1.0);
        let id = job.id.clone();
        store.insert(job.clone()).await;

        job.status = JobStatus::Running;
        store.save(&job).await.unwrap();

        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded.status, JobStatus::Running);
    }

    #[tokio::test]
    async fn cloned_handles_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        let job = Job::new("Shared", "CAISO_NORTH", Priority::Low, 1.0);
        let id = job.id.clone();
        store.insert(job).await;

        assert!(other.load(&id).await.unwrap().is_some());
    }
}
