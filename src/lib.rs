//! Carbon-aware job scheduling engine.
//!
//! Schedules computational jobs against a time-varying carbon-intensity
//! signal so work executes when or where it is least carbon-costly. Each
//! processing attempt reads the current intensity for the job's requested
//! region from an oracle and makes exactly one routing/timing decision:
//! run now, defer under a bounded retry protocol, or relocate to the
//! greenest reference region.
//!
//! All collaborators — the job store, the intensity provider, the dispatch
//! driver — are constructor-injected traits, so the engine carries no
//! process-wide state and every piece is testable in isolation.

pub mod config;
pub mod decision;
pub mod dispatch;
pub mod error;
pub mod job;
pub mod oracle;
pub mod processor;
pub mod store;

pub use config::SchedulerConfig;
pub use decision::{Decision, DecisionEngine};
pub use dispatch::{DispatchResult, Dispatcher, MAX_RETRIES};
pub use error::{SchedulerError, StoreError};
pub use job::{Job, JobStatus, Priority};
pub use oracle::{Credentials, FallbackSampler, IntensityProvider, WattTimeClient};
pub use processor::{AttemptOutcome, JobProcessor};
pub use store::{JobStore, MemoryStore};
