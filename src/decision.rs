//! Carbon-aware scheduling decisions.
//!
//! [`DecisionEngine::decide`] maps a current intensity reading and a job's
//! attributes to one of three actions: run in place, defer and re-check
//! later, or relocate to the greenest reference region. It is a pure
//! function; the only non-determinism in the system lives upstream, in the
//! oracle client's fallback draw.

use crate::job::Priority;

/// Below this intensity (gCO2eq/kWh) work runs immediately where requested.
pub const LOW_THRESHOLD: f64 = 150.0;

/// At or above this intensity work is relocated rather than deferred.
pub const HIGH_THRESHOLD: f64 = 250.0;

/// Fixed reference intensity of the designated always-green region.
pub const GREENEST_INTENSITY: f64 = 20.0;

/// Grid code of the designated always-green region (Norwegian hydro grid).
pub const GREENEST_REGION: &str = "NO1";

/// How long a deferred job waits before its next attempt.
pub const DELAY_SECONDS: u64 = 120;

/// Stand-in intensity for the savings calculation when the reading is
/// degenerate (zero or NaN). Keeps a broken reading from producing a
/// negative saving.
pub const FALLBACK_CALC_INTENSITY: f64 = 300.0;

/// The outcome of one scheduling evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Execute now in the requested region.
    Run {
        region: String,
        carbon_used: f64,
        carbon_saved: f64,
    },
    /// Abandon this attempt; re-evaluate after at least `wait_seconds`.
    Delay { wait_seconds: u64 },
    /// Execute now, relocated to [`GREENEST_REGION`].
    RegionHop {
        region: String,
        carbon_used: f64,
        carbon_saved: f64,
    },
}

/// Decides how one job-processing attempt should proceed.
pub struct DecisionEngine;

impl DecisionEngine {
    /// Evaluate the scheduling rules in order:
    ///
    /// 1. Reading below [`LOW_THRESHOLD`] — run in the requested region,
    ///    charged at the reading.
    /// 2. Reading in the medium band and priority below `High` — delay for
    ///    [`DELAY_SECONDS`] and re-check.
    /// 3. Otherwise — hop to [`GREENEST_REGION`]. High-priority jobs take
    ///    this branch out of the medium band too: they get an immediate,
    ///    carbon-costed path instead of an uncertain wait.
    ///
    /// Band edges are exact: a reading of exactly `LOW_THRESHOLD` or
    /// `HIGH_THRESHOLD` falls into the higher band.
    pub fn decide(
        intensity: f64,
        priority: Priority,
        energy_usage_kwh: f64,
        requested_region: &str,
    ) -> Decision {
        if intensity < LOW_THRESHOLD {
            return Decision::Run {
                region: requested_region.to_string(),
                carbon_used: intensity,
                carbon_saved: 0.0,
            };
        }

        if intensity < HIGH_THRESHOLD && priority != Priority::High {
            return Decision::Delay {
                wait_seconds: DELAY_SECONDS,
            };
        }

        Decision::RegionHop {
            region: GREENEST_REGION.to_string(),
            carbon_used: GREENEST_INTENSITY,
            carbon_saved: (effective_intensity(intensity) - GREENEST_INTENSITY)
                * energy_usage_kwh,
        }
    }
}

/// Savings are computed against the reading unless it is degenerate.
fn effective_intensity(intensity: f64) -> f64 {
    if intensity > 0.0 {
        intensity
    } else {
        FALLBACK_CALC_INTENSITY
    }
}
