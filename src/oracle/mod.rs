pub mod client;
pub mod error;
pub mod fallback;
pub mod types;

pub use client::{Credentials, IntensityProvider, WattTimeClient, LBS_TO_KG};
pub use error::OracleError;
pub use fallback::{FallbackSampler, RandomSampler, FALLBACK_INTENSITIES};
