//! Console rendering of a finished run.
use fhir_loadtest::ScenarioRun;
use fhir_loadtest_core::{RunSummary, ScenarioSpec, Verdict, Violation};
use std::fmt;

pub const BANNER: &str = "FHIR Converter Load Testing";
const RULE_WIDTH: usize = 50;

pub fn banner() -> String {
    format!("{BANNER}\n{}", "=".repeat(RULE_WIDTH))
}

pub fn scenario_header(name: &str, spec: &ScenarioSpec) -> String {
    format!("\nRunning {name} scenario: {}\n   {spec}", spec.description)
}

/// The results table and assessment printed after a run.
pub struct Report<'a> {
    pub summary: &'a RunSummary,
    pub verdict: Verdict,
    pub violations: &'a [Violation],
}

impl<'a> Report<'a> {
    pub fn new(run: &'a ScenarioRun, verdict: Verdict, violations: &'a [Violation]) -> Self {
        Self {
            summary: &run.summary,
            verdict,
            violations,
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;

        writeln!(f, "\nTest Results Summary:")?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "Total Requests:     {}", s.total_requests)?;
        writeln!(f, "Successful:         {}", s.success_count)?;
        writeln!(f, "Failed:             {}", s.failure_count)?;
        writeln!(f, "Error Rate:         {:.2}%", s.error_rate * 100.)?;
        writeln!(f, "Total Duration:     {:.2}s", s.duration_secs)?;
        writeln!(f, "Requests/Second:    {:.2}", s.throughput_rps)?;
        writeln!(f, "\nResponse Times (ms):")?;
        writeln!(f, "  Average:          {:.2}", s.mean_latency_ms)?;
        writeln!(f, "  Median:           {:.2}", s.median_latency_ms)?;
        writeln!(f, "  95th Percentile:  {:.2}", s.p95_latency_ms)?;
        writeln!(f, "  99th Percentile:  {:.2}", s.p99_latency_ms)?;
        writeln!(f, "  Min:              {:.2}", s.min_latency_ms)?;
        writeln!(f, "  Max:              {:.2}", s.max_latency_ms)?;

        writeln!(f, "\nPerformance Assessment: {}", self.verdict)?;
        match self.verdict {
            Verdict::Pass => write!(f, "All thresholds met - Performance is GOOD"),
            Verdict::Fail => {
                write!(f, "Some thresholds exceeded - Performance needs improvement")?;
                for violation in self.violations {
                    write!(f, "\n  - {violation}")?;
                }
                Ok(())
            }
        }
    }
}
