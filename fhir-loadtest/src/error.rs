use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadTestError {
    #[error("Unable to build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid target URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Health check against {url} returned status {status}.")]
    Unhealthy { url: String, status: u16 },

    #[error("Health check against {url} failed: {source}")]
    HealthUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
