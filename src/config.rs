// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Metrics configuration loading from environment variables or TOML.
//!
//! Environment values fall back to defaults when missing or invalid, without
//! crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `PULSE_METRICS_SOURCE` | host name | `source` tag on every line |
//! | `PULSE_METRICS_URL` | (empty) | Sink push URL |
//! | `PULSE_METRICS_USER_ID` | (empty) | Credential user id |
//! | `PULSE_METRICS_API_KEY` | (empty) | Credential API key |
//! | `PULSE_METRICS_PERIOD_MS` | 1000 | Reporting period (ms, floor 10) |
//! | `PULSE_METRICS_PUSH_TIMEOUT_MS` | 10000 | HTTP push timeout (ms, floor 100) |
//!
//! # TOML
//!
//! ```toml
//! [metrics]
//! source = "jwt-pizza-service"
//! endpoint_url = "https://influx.example.net/api/v1/push/influx/write"
//! user_id = "1234"
//! api_key = "secret"
//! reporting_period_ms = 1000
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_SOURCE: &str = "pulse-core";
const DEFAULT_PERIOD_MS: u64 = 1000;
pub(crate) const MIN_PERIOD_MS: u64 = 10;
const DEFAULT_PUSH_TIMEOUT_MS: u64 = 10_000;
const MIN_PUSH_TIMEOUT_MS: u64 = 100;

/// Errors loading configuration from a file or string.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for the reporter and its transport.
#[derive(Clone)]
pub struct MetricsConfig {
    pub source: String,
    pub endpoint_url: String,
    pub user_id: String,
    pub api_key: String,
    pub reporting_period: Duration,
    pub push_timeout: Duration,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            endpoint_url: String::new(),
            user_id: String::new(),
            api_key: String::new(),
            reporting_period: Duration::from_millis(DEFAULT_PERIOD_MS),
            push_timeout: Duration::from_millis(DEFAULT_PUSH_TIMEOUT_MS),
        }
    }
}

impl fmt::Debug for MetricsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsConfig")
            .field("source", &self.source)
            .field("endpoint_url", &self.endpoint_url)
            .field("user_id", &self.user_id)
            .field("api_key", &"<redacted>")
            .field("reporting_period", &self.reporting_period)
            .field("push_timeout", &self.push_timeout)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    metrics: RawMetrics,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetrics {
    source: Option<String>,
    endpoint_url: Option<String>,
    user_id: Option<String>,
    api_key: Option<String>,
    reporting_period_ms: Option<u64>,
    push_timeout_ms: Option<u64>,
}

impl RawMetrics {
    fn resolve(self) -> MetricsConfig {
        let defaults = MetricsConfig::default();
        MetricsConfig {
            source: self.source.filter(|s| !s.is_empty()).unwrap_or(defaults.source),
            endpoint_url: self.endpoint_url.unwrap_or_default(),
            user_id: self.user_id.unwrap_or_default(),
            api_key: self.api_key.unwrap_or_default(),
            reporting_period: period(self.reporting_period_ms.unwrap_or(DEFAULT_PERIOD_MS)),
            push_timeout: push_timeout(self.push_timeout_ms.unwrap_or(DEFAULT_PUSH_TIMEOUT_MS)),
        }
    }
}

impl MetricsConfig {
    /// Parse the `[metrics]` table of a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(input)?;
        Ok(file.metrics.resolve())
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    /// Check for obvious misconfigurations. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.endpoint_url.is_empty() {
            warnings.push("endpoint_url is empty; pushes will fail".to_string());
        } else if !(self.endpoint_url.starts_with("http://")
            || self.endpoint_url.starts_with("https://"))
        {
            warnings.push(format!(
                "endpoint_url {:?} is not an http(s) URL",
                self.endpoint_url
            ));
        }

        if self.user_id.is_empty() || self.api_key.is_empty() {
            warnings.push("user_id or api_key missing; sink will likely reject pushes".to_string());
        }

        if self.source.is_empty() {
            warnings.push("source is empty".to_string());
        }

        if self.reporting_period < Duration::from_millis(MIN_PERIOD_MS) {
            warnings.push(format!(
                "reporting_period {:?} is below the {}ms floor and will be raised",
                self.reporting_period, MIN_PERIOD_MS
            ));
        }

        warnings
    }
}

fn default_source() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string())
}

fn period(ms: u64) -> Duration {
    Duration::from_millis(ms.max(MIN_PERIOD_MS))
}

fn push_timeout(ms: u64) -> Duration {
    Duration::from_millis(ms.max(MIN_PUSH_TIMEOUT_MS))
}

/// Parse a `u64` env var, returning `default` on missing or invalid.
fn parse_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(val) => val.parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Load configuration from environment variables.
pub fn load() -> MetricsConfig {
    MetricsConfig {
        source: env_string("PULSE_METRICS_SOURCE").unwrap_or_else(default_source),
        endpoint_url: env_string("PULSE_METRICS_URL").unwrap_or_default(),
        user_id: env_string("PULSE_METRICS_USER_ID").unwrap_or_default(),
        api_key: env_string("PULSE_METRICS_API_KEY").unwrap_or_default(),
        reporting_period: period(parse_u64("PULSE_METRICS_PERIOD_MS", DEFAULT_PERIOD_MS)),
        push_timeout: push_timeout(parse_u64(
            "PULSE_METRICS_PUSH_TIMEOUT_MS",
            DEFAULT_PUSH_TIMEOUT_MS,
        )),
    }
}
