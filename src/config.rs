//! Client configuration from environment variables (and a `.env` file).

use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::NaiveTime;

use crate::advice::{AdvisoryConfig, DEFAULT_UNDER_EATING_HOUR};
use crate::report::ReportSettings;
use crate::target::{TargetPolicy, DEFAULT_CALORIE_FLOOR};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Pre-issued access token; takes precedence over email/password
    pub token: Option<String>,
    pub timeout: Duration,
    pub calorie_floor: f64,
    pub under_eating_hour: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            email: None,
            password: None,
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            calorie_floor: DEFAULT_CALORIE_FLOOR,
            under_eating_hour: DEFAULT_UNDER_EATING_HOUR,
        }
    }
}

impl ClientConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or empty keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeout = match get("FITNESS_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .map_err(|_| anyhow!("FITNESS_TIMEOUT_SECS must be a whole number: {v}"))?,
            ),
            None => defaults.timeout,
        };

        let calorie_floor = match get("FITNESS_CALORIE_FLOOR") {
            Some(v) => {
                let floor: f64 = v
                    .parse()
                    .map_err(|_| anyhow!("FITNESS_CALORIE_FLOOR must be a number: {v}"))?;
                if !floor.is_finite() || floor < 0.0 {
                    return Err(anyhow!("FITNESS_CALORIE_FLOOR must be non-negative: {v}"));
                }
                floor
            }
            None => defaults.calorie_floor,
        };

        let under_eating_hour = match get("FITNESS_UNDER_EATING_HOUR") {
            Some(v) => {
                let hour: u32 = v
                    .parse()
                    .map_err(|_| anyhow!("FITNESS_UNDER_EATING_HOUR must be 0-23: {v}"))?;
                if hour > 23 {
                    return Err(anyhow!("FITNESS_UNDER_EATING_HOUR must be 0-23: {v}"));
                }
                hour
            }
            None => defaults.under_eating_hour,
        };

        Ok(Self {
            api_url: get("FITNESS_API_URL").unwrap_or(defaults.api_url),
            email: get("FITNESS_EMAIL"),
            password: get("FITNESS_PASSWORD"),
            token: get("FITNESS_TOKEN"),
            timeout,
            calorie_floor,
            under_eating_hour,
        })
    }

    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            target: TargetPolicy {
                calorie_floor: self.calorie_floor,
            },
            advice: AdvisoryConfig {
                under_eating_after: NaiveTime::from_hms_opt(self.under_eating_hour, 0, 0)
                    .unwrap_or_else(|| AdvisoryConfig::default().under_eating_after),
            },
        }
    }
}
