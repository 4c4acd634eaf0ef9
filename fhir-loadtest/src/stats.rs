//! Reduction of collected outcomes into a [`RunSummary`].
use fhir_loadtest_core::{RequestOutcome, RunSummary};
use std::time::Duration;

pub const P95: f64 = 0.95;
pub const P99: f64 = 0.99;

/// Summarizes a run. `duration` is the wall-clock time of the whole batch.
///
/// No outcomes gives the all-zero summary. A zero `duration` reports a throughput of `0`.
pub fn reduce(outcomes: &[RequestOutcome], duration: Duration) -> RunSummary {
    if outcomes.is_empty() {
        return RunSummary::default();
    }

    let total_requests = outcomes.len();
    let success_count = outcomes.iter().filter(|o| o.succeeded()).count();
    let failure_count = total_requests - success_count;

    let mut latencies: Vec<f64> = outcomes.iter().map(RequestOutcome::latency_ms).collect();
    latencies.sort_by(f64::total_cmp);

    let duration_secs = duration.as_secs_f64();
    let throughput_rps = if duration_secs > 0. {
        total_requests as f64 / duration_secs
    } else {
        0.
    };

    RunSummary {
        total_requests,
        success_count,
        failure_count,
        duration_secs,
        mean_latency_ms: latencies.iter().sum::<f64>() / total_requests as f64,
        median_latency_ms: median(&latencies),
        p95_latency_ms: percentile(&latencies, P95),
        p99_latency_ms: percentile(&latencies, P99),
        min_latency_ms: latencies[0],
        max_latency_ms: latencies[total_requests - 1],
        throughput_rps,
        error_rate: failure_count as f64 / total_requests as f64,
    }
}

/// Nearest-rank percentile of ascending `sorted` values.
///
/// Picks `sorted[floor(quantile * n)]`, clamped to the last element, so any non-empty input
/// yields an observed sample. Returns `0.` for an empty slice.
pub fn percentile(sorted: &[f64], quantile: f64) -> f64 {
    if sorted.is_empty() {
        return 0.;
    }

    let rank = (quantile.clamp(0., 1.) * sorted.len() as f64).floor() as usize;
    sorted[rank.min(sorted.len() - 1)]
}

/// Middle value, or the mean of the two middle values for an even count.
fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        0.
    } else if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.
    }
}
