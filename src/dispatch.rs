//! Retry/delay protocol between the lifecycle controller and its caller.
//!
//! A [`Dispatcher`] plays the dispatch-substrate role for one job at a time:
//! it invokes [`JobProcessor::process_attempt`], honors each `Delayed`
//! signal by waiting at least the requested duration, and enforces the
//! retry ceiling. Re-invocation always re-enters the attempt from the top,
//! so every retry is a full re-evaluation against a fresh reading — a later
//! reading may land in any band, including back in the deferral band.

use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::SchedulerError;
use crate::job::JobStatus;
use crate::oracle::IntensityProvider;
use crate::processor::{AttemptOutcome, JobProcessor};
use crate::store::JobStore;

/// Ceiling on delay-and-retry cycles for a single job.
pub const MAX_RETRIES: u32 = 10;

/// Terminal result of driving one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// The job reached `Completed` (or already held final results).
    Completed,
    /// The retry ceiling was exceeded; the job was moved to `Failed`.
    RetriesExhausted,
    /// The job id was unknown.
    Skipped,
}

/// Drives a job through repeated processing attempts up to the retry
/// ceiling. Attempts for a single job are strictly sequential; distinct
/// jobs may be driven concurrently by separate callers.
pub struct Dispatcher<S, O> {
    processor: JobProcessor<S, O>,
    store: S,
    max_retries: u32,
}

impl<S: JobStore, O: IntensityProvider> Dispatcher<S, O> {
    pub fn new(processor: JobProcessor<S, O>, store: S) -> Self {
        Self {
            processor,
            store,
            max_retries: MAX_RETRIES,
        }
    }

    /// Override the retry ceiling.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Drive `job_id` to a terminal outcome.
    ///
    /// Storage failures abort the drive and propagate; they are eligible
    /// for the caller's own crash-retry policy, which is distinct from the
    /// delay protocol counted here.
    pub async fn drive(&self, job_id: &str) -> Result<DispatchResult, SchedulerError> {
        let mut retries: u32 = 0;
        loop {
            match self.processor.process_attempt(job_id).await? {
                AttemptOutcome::Completed { .. } | AttemptOutcome::AlreadyCompleted => {
                    return Ok(DispatchResult::Completed);
                }
                AttemptOutcome::Skipped => return Ok(DispatchResult::Skipped),
                AttemptOutcome::Delayed { wait, reason } => {
                    retries += 1;
                    if retries > self.max_retries {
                        warn!(job_id, retries, "retry ceiling exceeded, failing job");
                        self.mark_failed(job_id).await?;
                        return Ok(DispatchResult::RetriesExhausted);
                    }
                    info!(
                        job_id,
                        retry = retries,
                        max_retries = self.max_retries,
                        wait_secs = wait.as_secs(),
                        reason = %reason,
                        "retry requested"
                    );
                    sleep(wait).await;
                }
            }
        }
    }

    async fn mark_failed(&self, job_id: &str) -> Result<(), SchedulerError> {
        if let Some(mut job) = self.store.load(job_id).await? {
            job.status = JobStatus::Failed;
            job.touch();
            self.store.save(&job).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::job::{Job, Priority};
    use crate::store::MemoryStore;

    /// Oracle stub that replays a scripted sequence of readings, then
    /// repeats the last one.
    struct ScriptedIntensity(Mutex<Vec<f64>>);

    impl ScriptedIntensity {
        fn new(readings: &[f64]) -> Self {
            Self(Mutex::new(readings.to_vec()))
        }
    }

    impl IntensityProvider for ScriptedIntensity {
        async fn intensity(&self, _region: &str) -> f64 {
            let mut readings = self.0.lock().unwrap();
            if readings.len() > 1 {
                readings.remove(0)
            } else {
                readings[0]
            }
        }
    }

    fn dispatcher(
        store: MemoryStore,
        readings: &[f64],
    ) -> Dispatcher<MemoryStore, ScriptedIntensity> {
        let processor = JobProcessor::new(store.clone(), ScriptedIntensity::new(readings))
            .with_execution_sim(Duration::from_millis(10));
        Dispatcher::new(processor, store)
    }

    async fn submit(store: &MemoryStore) -> String {
        let job = Job::new("test job", "CAISO_NORTH", Priority::Low, 1.0);
        let id = job.id.clone();
        store.insert(job).await;
        id
    }

    #[tokio::test(start_paused = true)]
    async fn green_first_attempt_completes_without_retry() {
        let store = MemoryStore::new();
        let id = submit(&store).await;

        let result = dispatcher(store.clone(), &[30.0]).drive(&id).await.unwrap();

        assert_eq!(result, DispatchResult::Completed);
        let job = store.load(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_job_completes_once_the_window_clears() {
        let store = MemoryStore::new();
        let id = submit(&store).await;

        // Two medium readings, then a green one.
        let result = dispatcher(store.clone(), &[180.0, 200.0, 40.0])
            .drive(&id)
            .await
            .unwrap();

        assert_eq!(result, DispatchResult::Completed);
        let job = store.load(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.carbon_intensity_used, Some(40.0));
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_job_may_hop_on_a_later_reading() {
        let store = MemoryStore::new();
        let id = submit(&store).await;

        let result = dispatcher(store.clone(), &[180.0, 300.0])
            .drive(&id)
            .await
            .unwrap();

        assert_eq!(result, DispatchResult::Completed);
        let job = store.load(&id).await.unwrap().unwrap();
        assert_eq!(job.execution_region.as_deref(), Some(crate::decision::GREENEST_REGION));
        assert_eq!(job.carbon_saved, 280.0);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_medium_band_exhausts_ceiling_and_fails() {
        let store = MemoryStore::new();
        let id = submit(&store).await;

        let result = dispatcher(store.clone(), &[180.0])
            .with_max_retries(3)
            .drive(&id)
            .await
            .unwrap();

        assert_eq!(result, DispatchResult::RetriesExhausted);
        let job = store.load(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.execution_region, None);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_job_is_skipped() {
        let store = MemoryStore::new();
        let result = dispatcher(store, &[30.0]).drive("no-such-job").await.unwrap();
        assert_eq!(result, DispatchResult::Skipped);
    }

    #[tokio::test(start_paused = true)]
    async fn driving_a_completed_job_is_idempotent() {
        let store = MemoryStore::new();
        let id = submit(&store).await;

        let d = dispatcher(store.clone(), &[30.0]);
        assert_eq!(d.drive(&id).await.unwrap(), DispatchResult::Completed);

        let before = store.load(&id).await.unwrap().unwrap();
        assert_eq!(d.drive(&id).await.unwrap(), DispatchResult::Completed);
        let after = store.load(&id).await.unwrap().unwrap();

        assert_eq!(after.carbon_intensity_used, before.carbon_intensity_used);
        assert_eq!(after.carbon_saved, before.carbon_saved);
        assert_eq!(after.execution_region, before.execution_region);
    }
}
