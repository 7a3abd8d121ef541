//! Job lifecycle controller: one processing attempt, end to end.

use std::time::Duration;

use tokio::time::sleep;
use tracing::info;

use crate::decision::{Decision, DecisionEngine};
use crate::error::SchedulerError;
use crate::job::JobStatus;
use crate::oracle::IntensityProvider;
use crate::store::JobStore;

/// Default length of the simulated execution busy period.
const DEFAULT_EXECUTION_SIM: Duration = Duration::from_secs(5);

/// Outcome of a single processing attempt, as signaled back to the dispatch
/// substrate. Delay is an explicit variant rather than an error: deferral is
/// normal scheduling flow, not failure.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// The job executed (in place or relocated) and its results were
    /// persisted as final.
    Completed {
        region: String,
        carbon_used: f64,
        carbon_saved: f64,
    },
    /// The attempt was abandoned; re-invoke after at least `wait`.
    Delayed { wait: Duration, reason: String },
    /// Unknown job id — benign no-op.
    Skipped,
    /// The job already holds final results; nothing was touched.
    AlreadyCompleted,
}

/// Orchestrates one processing attempt against constructor-injected
/// collaborators: a job store and an intensity provider.
pub struct JobProcessor<S, O> {
    store: S,
    oracle: O,
    execution_sim: Duration,
}

impl<S: JobStore, O: IntensityProvider> JobProcessor<S, O> {
    pub fn new(store: S, oracle: O) -> Self {
        Self {
            store,
            oracle,
            execution_sim: DEFAULT_EXECUTION_SIM,
        }
    }

    /// Override the simulated execution duration (useful for testing).
    pub fn with_execution_sim(mut self, duration: Duration) -> Self {
        self.execution_sim = duration;
        self
    }

    /// Run one attempt: load the job, mark it running, read the current
    /// intensity for its requested region, decide, and apply the decision.
    ///
    /// Every status transition is persisted before the next step proceeds,
    /// so a crash mid-attempt leaves the job in its last persisted status.
    /// Storage failures are fatal to the attempt and propagate.
    pub async fn process_attempt(&self, job_id: &str) -> Result<AttemptOutcome, SchedulerError> {
        let Some(mut job) = self.store.load(job_id).await? else {
            info!(job_id, "job not found, skipping attempt");
            return Ok(AttemptOutcome::Skipped);
        };

        // Completed results are immutable; a stray re-dispatch must not
        // re-run the job or overwrite its figures.
        if job.status == JobStatus::Completed {
            info!(job_id, "job already completed, skipping attempt");
            return Ok(AttemptOutcome::AlreadyCompleted);
        }

        job.status = JobStatus::Running;
        job.touch();
        self.store.save(&job).await?;

        let intensity = self.oracle.intensity(&job.requested_region).await;
        let decision = DecisionEngine::decide(
            intensity,
            job.priority,
            job.energy_usage_kwh,
            &job.requested_region,
        );

        match decision {
            Decision::Run {
                region,
                carbon_used,
                carbon_saved,
            }
            | Decision::RegionHop {
                region,
                carbon_used,
                carbon_saved,
            } => {
                // Bounded busy period standing in for the real workload, so
                // completion is never instantaneous.
                sleep(self.execution_sim).await;

                job.status = JobStatus::Completed;
                job.execution_region = Some(region.clone());
                job.carbon_intensity_used = Some(carbon_used);
                job.carbon_saved = carbon_saved;
                job.touch();
                self.store.save(&job).await?;

                info!(
                    job_id,
                    region = %region,
                    carbon_used,
                    carbon_saved,
                    "job completed"
                );
                Ok(AttemptOutcome::Completed {
                    region,
                    carbon_used,
                    carbon_saved,
                })
            }
            Decision::Delay { wait_seconds } => {
                job.status = JobStatus::Delayed;
                job.touch();
                self.store.save(&job).await?;

                info!(job_id, intensity, wait_seconds, "job delayed");
                Ok(AttemptOutcome::Delayed {
                    wait: Duration::from_secs(wait_seconds),
                    reason: format!(
                        "carbon intensity {intensity:.1} gCO2eq/kWh in deferral band"
                    ),
                })
            }
        }
    }
}
