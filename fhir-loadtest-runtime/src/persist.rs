//! Writing a run's raw outcomes to disk.
use crate::RuntimeError;
use fhir_loadtest_core::RequestOutcome;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;
#[allow(unused)]
use tracing::{debug, info};

#[derive(Serialize)]
struct ResultsFile<'a> {
    timestamp: String,
    config: &'a Value,
    results: Vec<OutcomeRecord<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeRecord<'a> {
    issued_at: f64,
    latency_ms: f64,
    status_code: u16,
    succeeded: bool,
    error_detail: &'a str,
}

impl<'a> From<&'a RequestOutcome> for OutcomeRecord<'a> {
    fn from(outcome: &'a RequestOutcome) -> Self {
        Self {
            issued_at: outcome.issued_at_epoch_secs(),
            latency_ms: outcome.latency_ms(),
            status_code: outcome.status_code(),
            succeeded: outcome.succeeded(),
            error_detail: outcome.error_detail(),
        }
    }
}

/// `load-test-results_YYYYMMDD_HHMMSS.json` for the given instant.
pub fn results_file_name(at: OffsetDateTime) -> String {
    let stamp = at
        .format(format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_else(|_| at.unix_timestamp().to_string());
    format!("load-test-results_{stamp}.json")
}

/// Writes every outcome, together with the config document that produced them, into `dir`.
/// Returns the path written.
pub async fn save_results(
    dir: &Path,
    config: &Value,
    outcomes: &[RequestOutcome],
) -> Result<PathBuf, RuntimeError> {
    let now = OffsetDateTime::now_utc();
    let path = dir.join(results_file_name(now));

    let file = ResultsFile {
        timestamp: now
            .format(&Rfc3339)
            .unwrap_or_else(|_| now.unix_timestamp().to_string()),
        config,
        results: outcomes.iter().map(OutcomeRecord::from).collect(),
    };
    let body = serde_json::to_vec_pretty(&file).map_err(RuntimeError::SerializeResults)?;

    tokio::fs::write(&path, body)
        .await
        .map_err(|source| RuntimeError::Persist {
            path: path.clone(),
            source,
        })?;

    debug!("Wrote {} outcomes to {}", outcomes.len(), path.display());
    Ok(path)
}
