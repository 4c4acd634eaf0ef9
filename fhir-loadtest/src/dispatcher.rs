//! Single-request dispatch and the connection limits it runs under.
use crate::LoadTestError;
use fhir_loadtest_core::RequestOutcome;
use reqwest::{header::CONTENT_TYPE, Client, Url};
use std::collections::HashMap;
use std::error::Error as _;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
#[allow(unused)]
use tracing::{debug, error, trace};

#[cfg(feature = "metrics")]
pub const LATENCY_METRIC: &str = "fhir_loadtest.latency";
#[cfg(feature = "metrics")]
pub const SUCCESS_METRIC: &str = "fhir_loadtest.success";
#[cfg(feature = "metrics")]
pub const ERROR_METRIC: &str = "fhir_loadtest.error";

/// Caps the number of open requests, in total and per host, for everything sharing a session.
#[derive(Clone, Debug)]
pub struct ConnectionPool {
    total: Arc<Semaphore>,
    per_host_limit: usize,
    hosts: Arc<RwLock<HashMap<String, Arc<Semaphore>>>>,
}

impl ConnectionPool {
    pub fn new(max_connections: usize, max_connections_per_host: usize) -> Self {
        Self {
            total: Arc::new(Semaphore::new(max_connections)),
            per_host_limit: max_connections_per_host,
            hosts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The slice of the pool used for requests to `host` (a `host:port` key).
    pub fn host(&self, host: &str) -> HostPool {
        let existing = self
            .hosts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(host)
            .cloned();

        let host_limit = match existing {
            Some(limit) => limit,
            None => self
                .hosts
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(host.to_string())
                .or_insert_with(|| Arc::new(Semaphore::new(self.per_host_limit)))
                .clone(),
        };

        HostPool {
            total: self.total.clone(),
            host: host_limit,
        }
    }

    pub fn available(&self) -> usize {
        self.total.available_permits()
    }
}

#[derive(Clone, Debug)]
pub struct HostPool {
    total: Arc<Semaphore>,
    host: Arc<Semaphore>,
}

impl HostPool {
    /// Waits for both a per-host and a total slot. `None` only if the pool was closed.
    pub async fn acquire(&self) -> Option<PoolPermit> {
        let host = self.host.clone().acquire_owned().await.ok()?;
        let total = self.total.clone().acquire_owned().await.ok()?;
        Some(PoolPermit {
            _host: host,
            _total: total,
        })
    }

    pub fn available(&self) -> usize {
        self.host.available_permits()
    }
}

/// Holds a connection slot; dropping it gives the slot back.
#[derive(Debug)]
pub struct PoolPermit {
    _host: OwnedSemaphorePermit,
    _total: OwnedSemaphorePermit,
}

/// Sends the same JSON payload to one conversion endpoint, one POST per [`dispatch`] call.
///
/// [`dispatch`]: HttpDispatcher::dispatch
#[derive(Clone, Debug)]
pub struct HttpDispatcher {
    client: Client,
    url: Url,
    payload: Arc<String>,
    pool: HostPool,
}

impl HttpDispatcher {
    pub fn new(
        client: Client,
        url: &str,
        payload: impl Into<String>,
        pool: &ConnectionPool,
    ) -> Result<Self, LoadTestError> {
        let (url, host) = parse_target(url)?;
        Ok(Self {
            client,
            url,
            payload: Arc::new(payload.into()),
            pool: pool.host(&host),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Issues one request and records what happened. Never fails: network errors and
    /// timeouts become an outcome with status `0`.
    pub async fn dispatch(&self) -> RequestOutcome {
        let Some(_permit) = self.pool.acquire().await else {
            error!("Connection pool closed while requests were pending.");
            return RequestOutcome::transport_failure(
                SystemTime::now(),
                Duration::ZERO,
                "Connection pool is closed.",
            );
        };

        let issued_at = SystemTime::now();
        let start = Instant::now();
        let outcome = match self.send().await {
            Ok((status, body)) => RequestOutcome::response(issued_at, start.elapsed(), status, body),
            Err(err) => RequestOutcome::transport_failure(issued_at, start.elapsed(), describe(&err)),
        };

        if !outcome.succeeded() {
            debug!(
                status = outcome.status_code(),
                latency = ?outcome.latency(),
                "Request failed: {}",
                outcome.error_detail()
            );
        }

        #[cfg(feature = "metrics")]
        record_metrics(&outcome);

        outcome
    }

    async fn send(&self) -> Result<(u16, String), reqwest::Error> {
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(self.payload.as_ref().clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        // NOTE: Latency includes reading the full body.
        let body = response.text().await?;
        Ok((status, body))
    }
}

/// Parses `url` and derives the `host:port` key used for per-host limits.
pub(crate) fn parse_target(url: &str) -> Result<(Url, String), LoadTestError> {
    let invalid = |reason: String| LoadTestError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| invalid("missing host".to_string()))?;
    let key = match parsed.port_or_known_default() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    Ok((parsed, key))
}

fn describe(err: &reqwest::Error) -> String {
    let mut detail = if err.is_timeout() {
        format!("Request timed out: {err}")
    } else {
        err.to_string()
    };

    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

#[cfg(feature = "metrics")]
fn record_metrics(outcome: &RequestOutcome) {
    metrics::histogram!(LATENCY_METRIC).record(outcome.latency().as_secs_f64());
    if outcome.succeeded() {
        metrics::counter!(SUCCESS_METRIC).increment(1);
    } else {
        metrics::counter!(ERROR_METRIC, "status" => outcome.status_code().to_string()).increment(1);
    }
}
