//! Wire types for the intensity API's login and forecast endpoints.

use serde::{Deserialize, Serialize};

/// Response body of the `/v2/login` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent forecast requests.
    pub token: String,
}

/// Response body of the `/v3/forecast` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    /// Forecast points, soonest first. May be empty.
    #[serde(default)]
    pub data: Vec<ForecastPoint>,
}

/// A single forecast data point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Marginal emissions rate in lbs CO2eq per MWh. The provider may emit
    /// a point with no value.
    #[serde(default)]
    pub value: Option<f64>,
    /// Timestamp of the point, as reported by the provider.
    #[serde(default)]
    pub point_time: Option<String>,
}
