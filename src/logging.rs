//! `tracing` subscriber setup for binaries.
//!
//! Logs go to stderr so JSON reports on stdout stay machine-readable.

use std::io;

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

impl LogFormat {
    /// Unknown values fall back to pretty output.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("json") => LogFormat::Json,
            Some("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Fallback directive when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref()),
        }
    }

    /// Install the global subscriber. Fails if one is already set.
    pub fn init(&self) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(env_filter);

        let result = match self.format {
            LogFormat::Json => registry
                .with(fmt::layer().with_writer(io::stderr).with_target(true).json())
                .try_init(),
            LogFormat::Pretty => registry
                .with(fmt::layer().with_writer(io::stderr).with_target(true).pretty())
                .try_init(),
            LogFormat::Compact => registry
                .with(fmt::layer().with_writer(io::stderr).with_target(false).compact())
                .try_init(),
        };

        result.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
    }
}

/// Initialise logging from `RUST_LOG` / `LOG_FORMAT`.
pub fn init() -> Result<()> {
    LoggingConfig::from_env().init()
}
