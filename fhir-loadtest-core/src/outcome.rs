use crate::{SUCCESS_STATUS, TRANSPORT_FAILURE_STATUS};
use std::time::{Duration, SystemTime};

/// The recorded result of one attempted request.
///
/// Only constructible through [`RequestOutcome::response`] and
/// [`RequestOutcome::transport_failure`], and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    issued_at: SystemTime,
    latency: Duration,
    status_code: u16,
    succeeded: bool,
    error_detail: String,
}

impl RequestOutcome {
    /// An HTTP response was received and its body fully read.
    ///
    /// The body is kept as the error detail for any status other than 200 and dropped
    /// otherwise.
    pub fn response(issued_at: SystemTime, latency: Duration, status_code: u16, body: String) -> Self {
        let succeeded = status_code == SUCCESS_STATUS;
        Self {
            issued_at,
            latency,
            status_code,
            succeeded,
            error_detail: if succeeded { String::new() } else { body },
        }
    }

    /// No usable HTTP response: timeout, refused connection, DNS or any other network error.
    pub fn transport_failure(
        issued_at: SystemTime,
        latency: Duration,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            issued_at,
            latency,
            status_code: TRANSPORT_FAILURE_STATUS,
            succeeded: false,
            error_detail: detail.into(),
        }
    }

    pub fn issued_at(&self) -> SystemTime {
        self.issued_at
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn latency_ms(&self) -> f64 {
        self.latency.as_nanos() as f64 / 1_000_000.
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn error_detail(&self) -> &str {
        &self.error_detail
    }

    /// Seconds since the Unix epoch at which the request was issued.
    pub fn issued_at_epoch_secs(&self) -> f64 {
        self.issued_at
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default()
    }
}
