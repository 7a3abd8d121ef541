//! Fallback readings for when no live intensity data is available.

use rand::Rng;

/// Representative low, medium and high intensities (gCO2eq/kWh) drawn when
/// the live API is unreachable or returns nothing usable. One value per
/// decision band, so the engine stays exercisable without credentials.
pub const FALLBACK_INTENSITIES: [f64; 3] = [100.0, 250.0, 400.0];

/// Source of fallback intensity draws.
///
/// Injectable so tests can pin the draw; the production sampler picks
/// uniformly at random.
pub trait FallbackSampler: Send + Sync {
    fn sample(&self) -> f64;
}

/// Draws uniformly from [`FALLBACK_INTENSITIES`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSampler;

impl FallbackSampler for RandomSampler {
    fn sample(&self) -> f64 {
        let idx = rand::rng().random_range(0..FALLBACK_INTENSITIES.len());
        FALLBACK_INTENSITIES[idx]
    }
}
