use std::fmt;

/// Statistics for a single scenario run.
///
/// Latencies are in milliseconds. A run with no outcomes is the all-zero
/// [`RunSummary::default()`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub total_requests: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub duration_secs: f64,
    pub mean_latency_ms: f64,
    pub median_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub p99_latency_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
    pub throughput_rps: f64,
    pub error_rate: f64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Requests={}, Errors={}, ErrorRate={:.2}, RPS={:.2}, mean={:.2}ms, p50={:.2}ms, p95={:.2}ms, p99={:.2}ms",
            self.total_requests,
            self.failure_count,
            self.error_rate,
            self.throughput_rps,
            self.mean_latency_ms,
            self.median_latency_ms,
            self.p95_latency_ms,
            self.p99_latency_ms,
        )
    }
}
