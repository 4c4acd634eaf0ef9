//! Scoped ownership of the HTTP client and connection pool.
use crate::dispatcher::{parse_target, ConnectionPool, HttpDispatcher};
use crate::LoadTestError;
use fhir_loadtest_core::{ClientSettings, SUCCESS_STATUS};
use reqwest::Client;
#[allow(unused)]
use tracing::{debug, error, info};

/// Everything a tester needs to talk to the service under test.
///
/// All dispatchers created from one session share its client and its connection limits.
/// Dropping the session closes idle connections; in-flight requests keep their own handles.
pub struct LoadSession {
    client: Client,
    pool: ConnectionPool,
    settings: ClientSettings,
}

impl LoadSession {
    pub fn new(settings: &ClientSettings) -> Result<Self, LoadTestError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .pool_max_idle_per_host(settings.max_connections_per_host)
            .build()
            .map_err(LoadTestError::Client)?;

        #[cfg(feature = "metrics")]
        describe_metrics();

        debug!(
            "Session ready: timeout={}, maxConnections={}, maxConnectionsPerHost={}",
            humantime::format_duration(settings.timeout),
            settings.max_connections,
            settings.max_connections_per_host
        );

        Ok(Self {
            client,
            pool: ConnectionPool::new(settings.max_connections, settings.max_connections_per_host),
            settings: settings.clone(),
        })
    }

    /// GETs `url` and succeeds only on a `200`.
    pub async fn health_check(&self, url: &str) -> Result<(), LoadTestError> {
        let (target, host) = parse_target(url)?;
        let _permit = self.pool.host(&host).acquire().await;

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|source| LoadTestError::HealthUnreachable {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        if status == SUCCESS_STATUS {
            info!("Health check passed for {url}");
            Ok(())
        } else {
            Err(LoadTestError::Unhealthy {
                url: url.to_string(),
                status,
            })
        }
    }

    pub fn dispatcher(
        &self,
        url: &str,
        payload: impl Into<String>,
    ) -> Result<HttpDispatcher, LoadTestError> {
        HttpDispatcher::new(self.client.clone(), url, payload, &self.pool)
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }
}

#[cfg(feature = "metrics")]
fn describe_metrics() {
    use crate::dispatcher::{ERROR_METRIC, LATENCY_METRIC, SUCCESS_METRIC};

    metrics::describe_histogram!(
        LATENCY_METRIC,
        metrics::Unit::Seconds,
        "Latency of conversion requests, including the response body."
    );
    metrics::describe_counter!(SUCCESS_METRIC, "Conversion requests answered with 200.");
    metrics::describe_counter!(ERROR_METRIC, "Conversion requests that failed, by status.");
}
