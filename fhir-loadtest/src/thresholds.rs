//! Pass/fail assessment of a [`RunSummary`].
use fhir_loadtest_core::{PerformanceThresholds, RunSummary, Verdict, Violation};
#[allow(unused)]
use tracing::{debug, warn};

/// `Pass` iff the mean latency, error rate and throughput all meet their bound. Bounds are
/// inclusive.
pub fn evaluate(summary: &RunSummary, thresholds: &PerformanceThresholds) -> Verdict {
    let violations = violations(summary, thresholds);
    if violations.is_empty() {
        Verdict::Pass
    } else {
        for violation in &violations {
            warn!("Threshold not met: {violation}");
        }
        Verdict::Fail
    }
}

/// Every bound `summary` does not meet, in the order response time, error rate, throughput.
pub fn violations(summary: &RunSummary, thresholds: &PerformanceThresholds) -> Vec<Violation> {
    let mut out = vec![];

    if summary.mean_latency_ms > thresholds.max_response_time_ms {
        out.push(Violation::ResponseTime {
            mean_ms: summary.mean_latency_ms,
            max_ms: thresholds.max_response_time_ms,
        });
    }

    if summary.error_rate > thresholds.max_error_rate {
        out.push(Violation::ErrorRate {
            actual: summary.error_rate,
            max: thresholds.max_error_rate,
        });
    }

    if summary.throughput_rps < thresholds.min_throughput_rps {
        out.push(Violation::Throughput {
            actual_rps: summary.throughput_rps,
            min_rps: thresholds.min_throughput_rps,
        });
    }

    out
}
