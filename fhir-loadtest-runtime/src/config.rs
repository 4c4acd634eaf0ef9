//! Loading the JSON configuration file.
use crate::RuntimeError;
use fhir_loadtest_core::LoadTestConfig;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
#[allow(unused)]
use tracing::{debug, info};

/// A validated configuration together with the document it was read from.
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    pub config: LoadTestConfig,
    /// The file's JSON as written, echoed back into saved results.
    pub document: Value,
}

/// Reads, parses and validates the config at `path`.
pub async fn load_config(path: &Path) -> Result<LoadedConfig, RuntimeError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RuntimeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

    let loaded = parse_config(path, &raw)?;
    debug!(
        "Loaded {} with {} scenarios",
        path.display(),
        loaded.config.test_scenarios.len()
    );
    Ok(loaded)
}

pub(crate) fn parse_config(path: &Path, raw: &str) -> Result<LoadedConfig, RuntimeError> {
    let parse_error = |source: serde_json::Error| RuntimeError::ConfigParse {
        path: path.to_path_buf(),
        source,
    };
    let document: Value = serde_json::from_str(raw).map_err(parse_error)?;
    let config = LoadTestConfig::deserialize(&document).map_err(parse_error)?;
    config.validate()?;
    Ok(LoadedConfig { config, document })
}
