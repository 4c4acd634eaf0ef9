//! Test data fixtures and the payload built from them.
use crate::RuntimeError;
use fhir_loadtest_core::{ConversionEnvelope, DataType};
use std::path::Path;

/// Reads the fixture at `path` and wraps its trimmed text in a conversion envelope.
pub async fn load_payload(data_type: DataType, path: &Path) -> Result<String, RuntimeError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RuntimeError::FixtureRead {
            path: path.to_path_buf(),
            source,
        })?;

    build_payload(data_type, &raw)
}

pub fn build_payload(data_type: DataType, raw: &str) -> Result<String, RuntimeError> {
    serde_json::to_string(&ConversionEnvelope::new(data_type, raw.trim()))
        .map_err(RuntimeError::Payload)
}
