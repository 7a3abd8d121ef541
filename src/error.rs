use thiserror::Error;

/// Failure in the storage collaborator.
///
/// The in-memory backend never produces these; the variant exists for real
/// backends behind the same [`JobStore`](crate::store::JobStore) seam.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors fatal to a single processing attempt.
///
/// Oracle unavailability is deliberately absent: the intensity client
/// degrades to a fallback reading instead of failing the attempt. An
/// unknown job id is a benign no-op, not an error. Only storage failures
/// propagate, so the dispatch substrate can apply its own crash-retry
/// policy.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}
