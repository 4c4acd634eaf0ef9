use fhir_loadtest_runtime::{LoadTestRuntime, DEFAULT_LOG_FILTER};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Unable to install the log subscriber: {err}");
    }

    match LoadTestRuntime::new().with_args().run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(kind = ?err.kind(), "{err}");
            ExitCode::FAILURE
        }
    }
}
