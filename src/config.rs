//! Scheduler configuration loaded from `carbonshift.toml`.
//!
//! [`SchedulerConfig`] holds the configurable parameters. Fields missing
//! from the file use their defaults. The `WATTTIME_USERNAME` and
//! `WATTTIME_PASSWORD` environment variables take precedence over the file
//! for credentials; with neither set, the oracle client runs fallback-only.

use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::dispatch::MAX_RETRIES;
use crate::oracle::Credentials;

/// Top-level configuration loaded from `carbonshift.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Intensity API username.
    #[serde(default)]
    pub watttime_username: String,

    /// Intensity API password.
    #[serde(default)]
    pub watttime_password: String,

    /// Base URL of the intensity API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Maximum delay-and-retry cycles before a job is failed.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Length of the simulated execution busy period, in milliseconds.
    #[serde(default = "default_execution_sim_ms")]
    pub execution_sim_ms: u64,
}

fn default_api_base_url() -> String {
    "https://api2.watttime.org".to_string()
}

fn default_max_retries() -> u32 {
    MAX_RETRIES
}

fn default_execution_sim_ms() -> u64 {
    5000
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            watttime_username: String::new(),
            watttime_password: String::new(),
            api_base_url: default_api_base_url(),
            max_retries: default_max_retries(),
            execution_sim_ms: default_execution_sim_ms(),
        }
    }
}

impl SchedulerConfig {
    /// Loads configuration from `carbonshift.toml` in the current directory.
    /// Uses defaults if the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("carbonshift.toml"))
    }

    /// Loads configuration from `path`, then applies environment-variable
    /// precedence for the credentials.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<SchedulerConfig>(&contents)?
        } else {
            Self::default()
        };

        if let Ok(user) = std::env::var("WATTTIME_USERNAME")
            && !user.is_empty()
        {
            config.watttime_username = user;
        }
        if let Ok(pass) = std::env::var("WATTTIME_PASSWORD")
            && !pass.is_empty()
        {
            config.watttime_password = pass;
        }

        Ok(config)
    }

    /// API credentials, when both parts are configured.
    pub fn credentials(&self) -> Option<Credentials> {
        if self.watttime_username.is_empty() || self.watttime_password.is_empty() {
            return None;
        }
        Some(Credentials {
            username: self.watttime_username.clone(),
            password: self.watttime_password.clone(),
        })
    }
}
