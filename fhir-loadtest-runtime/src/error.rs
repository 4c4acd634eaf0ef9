use fhir_loadtest::LoadTestError;
use fhir_loadtest_core::{ConfigError, DataType};
use std::path::PathBuf;
use thiserror::Error;

/// Broad class of a [`RuntimeError`], for deciding how to report it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Config or fixture missing, unreadable or invalid. Nothing was sent.
    Configuration,
    /// The requested run is not described by the config. Nothing was sent.
    Validation,
    /// The service failed its preflight check. No load was sent.
    HealthCheck,
    /// The run finished but its results could not be written.
    Persist,
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Unable to read configuration file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to parse configuration file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Unable to read test data file {}: {source}", path.display())]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to build the request payload: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("Unable to set up the HTTP session: {0}")]
    Session(#[source] LoadTestError),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("No conversion endpoint configured for {0}.")]
    MissingEndpoint(DataType),

    #[error("No test data configured for {0}.")]
    MissingTestData(DataType),

    #[error("Health check failed: {0}")]
    HealthCheck(#[source] LoadTestError),

    #[error("Unable to save results to {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to serialize results: {0}")]
    SerializeResults(#[source] serde_json::Error),
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::ConfigRead { .. }
            | RuntimeError::ConfigParse { .. }
            | RuntimeError::InvalidConfig(_)
            | RuntimeError::FixtureRead { .. }
            | RuntimeError::Payload(_)
            | RuntimeError::Session(_) => ErrorKind::Configuration,
            RuntimeError::UnknownScenario(_)
            | RuntimeError::MissingEndpoint(_)
            | RuntimeError::MissingTestData(_) => ErrorKind::Validation,
            RuntimeError::HealthCheck(_) => ErrorKind::HealthCheck,
            RuntimeError::Persist { .. } | RuntimeError::SerializeResults(_) => ErrorKind::Persist,
        }
    }
}
