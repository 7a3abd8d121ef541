use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scheduling priority of a job.
///
/// High-priority work never waits out a medium-carbon window; when the
/// reading lands in the deferral band it relocates instead (see
/// [`DecisionEngine`](crate::decision::DecisionEngine)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Normal,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Normal => write!(f, "Normal"),
            Priority::High => write!(f, "High"),
        }
    }
}

/// Lifecycle status of a job.
///
/// Transitions are driven solely by the lifecycle controller:
/// `Pending → Running`, then either `Completed` (terminal) or `Delayed`,
/// which cycles back through `Running` on the next attempt. A job whose
/// delay retries are exhausted is moved to `Failed` by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Running,
    Delayed,
    Completed,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "Pending"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Delayed => write!(f, "Delayed"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// A unit of schedulable work.
///
/// `id`, `name`, `requested_region`, `priority` and `energy_usage_kwh` are
/// fixed at creation. The result fields are written exactly once, when the
/// job completes; `carbon_saved` stays 0 unless the job was relocated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub requested_region: String,
    pub priority: Priority,
    /// Estimated energy draw of the workload, in kilowatt-hours.
    pub energy_usage_kwh: f64,
    pub status: JobStatus,
    /// Region the job actually executed in. Set only on completion.
    pub execution_region: Option<String>,
    /// Intensity charged to the job, in gCO2eq/kWh. Set only on completion.
    pub carbon_intensity_used: Option<f64>,
    /// Grams of CO2eq avoided by relocating, relative to the local reading.
    pub carbon_saved: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(
        name: impl Into<String>,
        requested_region: impl Into<String>,
        priority: Priority,
        energy_usage_kwh: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            requested_region: requested_region.into(),
            priority,
            energy_usage_kwh,
            status: JobStatus::Pending,
            execution_region: None,
            carbon_intensity_used: None,
            carbon_saved: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at`. Called on every persisted transition.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_creation_defaults() {
        let job = Job::new("Nightly batch", "CAISO_NORTH", Priority::Normal, 2.5);
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.requested_region, "CAISO_NORTH");
        assert_eq!(job.energy_usage_kwh, 2.5);
        assert_eq!(job.execution_region, None);
        assert_eq!(job.carbon_intensity_used, None);
        assert_eq!(job.carbon_saved, 0.0);
        assert_eq!(job.created_at, job.updated_at);
    }

    #[test]
    fn job_ids_are_unique() {
        let a = Job::new("a", "CAISO_NORTH", Priority::Low, 1.0);
        let b = Job::new("b", "CAISO_NORTH", Priority::Low, 1.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn touch_advances_updated_at() {
        let mut job = Job::new("a", "CAISO_NORTH", Priority::Low, 1.0);
        let before = job.updated_at;
        job.touch();
        assert!(job.updated_at >= before);
    }

    #[test]
    fn job_serialization_roundtrip() {
        let mut job = Job::new("Model training", "PJM_DC", Priority::High, 12.0);
        job.status = JobStatus::Completed;
        job.execution_region = Some("PJM_DC".into());
        job.carbon_intensity_used = Some(42.0);

        let json = serde_json::to_string(&job).unwrap();
        let parsed: Job = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, job.id);
        assert_eq!(parsed.status, JobStatus::Completed);
        assert_eq!(parsed.priority, Priority::High);
        assert_eq!(parsed.execution_region.as_deref(), Some("PJM_DC"));
        assert_eq!(parsed.carbon_intensity_used, Some(42.0));
    }

    #[test]
    fn status_display() {
        assert_eq!(JobStatus::Pending.to_string(), "Pending");
        assert_eq!(JobStatus::Delayed.to_string(), "Delayed");
        assert_eq!(JobStatus::Failed.to_string(), "Failed");
        assert_eq!(Priority::High.to_string(), "High");
    }
}
