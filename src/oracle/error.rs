use thiserror::Error;

/// Failures while talking to the carbon-intensity API.
///
/// None of these cross the [`IntensityProvider`](super::IntensityProvider)
/// boundary: the client logs the failure and degrades to a fallback reading,
/// so a scheduling decision always has some input.
#[derive(Debug, Error)]
pub enum OracleError {
    /// No username/password configured. The client runs fallback-only.
    #[error("no intensity API credentials configured")]
    MissingCredentials,

    /// The API returned a non-success status (e.g. 403 bad credentials,
    /// 500 provider outage).
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The forecast response decoded but held no usable data point.
    #[error("forecast response contained no usable data points")]
    EmptyForecast,

    /// Network-layer failure (DNS, refused connection, timeout) or a
    /// malformed response body.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
