use crate::{
    DataType, PerformanceThresholds, ScenarioSpec, DEFAULT_MAX_CONNECTIONS,
    DEFAULT_MAX_CONNECTIONS_PER_HOST, DEFAULT_REQUEST_TIMEOUT,
};
#[cfg(feature = "rt")]
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
#[cfg(feature = "rt")]
use serde_with::{serde_as, DurationSeconds};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// The full load-test configuration, as loaded from `load-test-config.json`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "rt", serde(rename_all = "camelCase"))]
pub struct LoadTestConfig {
    pub endpoints: Endpoints,
    pub test_scenarios: BTreeMap<String, ScenarioSpec>,
    /// Fixture paths keyed by data type name. Keys other than the known data types are kept
    /// but never looked up.
    #[cfg_attr(feature = "rt", serde(default))]
    pub test_data: BTreeMap<String, PathBuf>,
    pub performance_thresholds: PerformanceThresholds,
    #[cfg_attr(feature = "rt", serde(default))]
    pub client: ClientSettings,
}

/// Paths are appended verbatim to `base_url`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "rt", serde(rename_all = "camelCase"))]
pub struct Endpoints {
    pub base_url: String,
    pub health: String,
    #[cfg_attr(feature = "rt", serde(default))]
    pub hl7v2: Option<String>,
    #[cfg_attr(feature = "rt", serde(default))]
    pub ccda: Option<String>,
    #[cfg_attr(feature = "rt", serde(default))]
    pub json: Option<String>,
}

impl Endpoints {
    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, self.health)
    }

    pub fn conversion_url(&self, data_type: DataType) -> Option<String> {
        let path = match data_type {
            DataType::Hl7v2 => self.hl7v2.as_ref(),
            DataType::Ccda => self.ccda.as_ref(),
            DataType::Json => self.json.as_ref(),
        }?;
        Some(format!("{}{}", self.base_url, path))
    }
}

/// HTTP client limits shared by every request of a session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "rt", cfg_eval::cfg_eval, serde_as)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "rt", serde(rename_all = "camelCase", default))]
pub struct ClientSettings {
    #[cfg_attr(
        feature = "rt",
        serde_as(as = "DurationSeconds<u64>"),
        serde(rename = "timeoutSeconds")
    )]
    pub timeout: Duration,
    pub max_connections: usize,
    pub max_connections_per_host: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_connections_per_host: DEFAULT_MAX_CONNECTIONS_PER_HOST,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Scenario `{0}` must send at least one request.")]
    NoRequests(String),

    #[error("maxErrorRate must be within [0, 1], found {0}.")]
    ErrorRateOutOfRange(f64),

    #[error("{name} must be a non-negative number, found {value}.")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("{0} must be at least 1.")]
    ZeroLimit(&'static str),

    #[error("timeoutSeconds must be at least 1.")]
    ZeroTimeout,
}

impl LoadTestConfig {
    pub fn scenario(&self, name: &str) -> Option<&ScenarioSpec> {
        self.test_scenarios.get(name)
    }

    pub fn test_data_path(&self, data_type: DataType) -> Option<&Path> {
        self.test_data
            .get(data_type.as_str())
            .map(PathBuf::as_path)
    }

    /// Semantic checks that deserialization alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((name, _)) = self.test_scenarios.iter().find(|(_, s)| s.requests == 0) {
            return Err(ConfigError::NoRequests(name.clone()));
        }

        let thresholds = &self.performance_thresholds;
        if !(0. ..=1.).contains(&thresholds.max_error_rate) {
            return Err(ConfigError::ErrorRateOutOfRange(thresholds.max_error_rate));
        }
        for (name, value) in [
            ("maxResponseTimeMs", thresholds.max_response_time_ms),
            ("minThroughputRps", thresholds.min_throughput_rps),
        ] {
            if !value.is_finite() || value < 0. {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        if self.client.max_connections == 0 {
            return Err(ConfigError::ZeroLimit("maxConnections"));
        }
        if self.client.max_connections_per_host == 0 {
            return Err(ConfigError::ZeroLimit("maxConnectionsPerHost"));
        }
        if self.client.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }
}
