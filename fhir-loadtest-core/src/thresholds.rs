#[cfg(feature = "rt")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Acceptance bounds a run is judged against.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "rt", serde(rename_all = "camelCase"))]
pub struct PerformanceThresholds {
    /// Upper bound on the mean latency, in milliseconds.
    #[cfg_attr(feature = "rt", serde(alias = "maxResponseTime"))]
    pub max_response_time_ms: f64,
    /// Upper bound on the failed fraction of requests, in `[0, 1]`.
    pub max_error_rate: f64,
    /// Lower bound on requests completed per second.
    #[cfg_attr(feature = "rt", serde(alias = "minThroughput"))]
    pub min_throughput_rps: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail => f.write_str("FAIL"),
        }
    }
}

/// A single bound a run failed to meet, with the observed and allowed values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Violation {
    ResponseTime { mean_ms: f64, max_ms: f64 },
    ErrorRate { actual: f64, max: f64 },
    Throughput { actual_rps: f64, min_rps: f64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::ResponseTime { mean_ms, max_ms } => write!(
                f,
                "mean response time {mean_ms:.2}ms exceeds {max_ms:.2}ms"
            ),
            Violation::ErrorRate { actual, max } => write!(
                f,
                "error rate {:.2}% exceeds {:.2}%",
                actual * 100.,
                max * 100.
            ),
            Violation::Throughput {
                actual_rps,
                min_rps,
            } => write!(
                f,
                "throughput {actual_rps:.2} req/s is below {min_rps:.2} req/s"
            ),
        }
    }
}
