use std::time::Duration;

use reqwest::Client;
use tracing::warn;

use super::error::OracleError;
use super::fallback::{FallbackSampler, RandomSampler};
use super::types::{ForecastResponse, LoginResponse};
use crate::config::SchedulerConfig;

const API_BASE: &str = "https://api2.watttime.org";

/// Pounds-to-kilograms factor applied to the provider's lbs/MWh readings.
pub const LBS_TO_KG: f64 = 0.453592;

/// Anything that can produce a current carbon-intensity reading for a region.
///
/// Total by contract: implementations always return a number, degrading
/// internally rather than surfacing errors to the caller.
pub trait IntensityProvider {
    async fn intensity(&self, region: &str) -> f64;
}

/// Basic-auth credentials for the intensity API.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Client for the WattTime-style carbon-intensity API.
///
/// Logs in with basic auth to obtain a bearer token, then requests a
/// marginal-emissions forecast for a region. Any failure along the way —
/// missing credentials, transport error, bad status, malformed or empty
/// payload — degrades to a draw from the fixed fallback set.
pub struct WattTimeClient<F = RandomSampler> {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
    sampler: F,
}

impl WattTimeClient {
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self::with_base_url(credentials, API_BASE.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(credentials: Option<Credentials>, base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url,
            credentials,
            sampler: RandomSampler,
        }
    }

    /// Build a client from loaded configuration.
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::with_base_url(config.credentials(), config.api_base_url.clone())
    }
}

impl<F: FallbackSampler> WattTimeClient<F> {
    /// Same client with a pinned fallback sampler.
    pub fn with_sampler<G: FallbackSampler>(self, sampler: G) -> WattTimeClient<G> {
        WattTimeClient {
            client: self.client,
            base_url: self.base_url,
            credentials: self.credentials,
            sampler,
        }
    }

    async fn login(&self) -> Result<String, OracleError> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or(OracleError::MissingCredentials)?;

        let response = self
            .client
            .get(format!("{}/v2/login", self.base_url))
            .basic_auth(&creds.username, Some(&creds.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(OracleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<LoginResponse>().await?;
        Ok(body.token)
    }

    /// Fetch the nearest forecast point for `region`, converted to
    /// gCO2eq/kWh and rounded to one decimal.
    async fn fetch_forecast(&self, region: &str) -> Result<f64, OracleError> {
        let token = self.login().await?;

        let response = self
            .client
            .get(format!("{}/v3/forecast", self.base_url))
            .bearer_auth(token)
            .query(&[("region", region), ("signal_type", "co2_moer")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(OracleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<ForecastResponse>().await?;
        let moer_lbs_mwh = body
            .data
            .first()
            .and_then(|point| point.value)
            .ok_or(OracleError::EmptyForecast)?;

        Ok(to_grams_per_kwh(moer_lbs_mwh))
    }
}

/// Convert the provider's native lbs/MWh reading to gCO2eq/kWh, rounded to
/// one decimal place.
fn to_grams_per_kwh(moer_lbs_per_mwh: f64) -> f64 {
    (moer_lbs_per_mwh * LBS_TO_KG * 10.0).round() / 10.0
}

impl<F: FallbackSampler> IntensityProvider for WattTimeClient<F> {
    async fn intensity(&self, region: &str) -> f64 {
        match self.fetch_forecast(region).await {
            Ok(value) => value,
            Err(err) => {
                let value = self.sampler.sample();
                warn!(
                    region,
                    error = %err,
                    fallback = value,
                    "intensity lookup failed, using fallback reading"
                );
                value
            }
        }
    }
}
