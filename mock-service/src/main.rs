use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const METRICS_ADDR: &str = "0.0.0.0:8002";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mock_service=debug,tower_http=info")),
        )
        .init();

    PrometheusBuilder::new()
        .with_http_listener(METRICS_ADDR.parse::<SocketAddr>()?)
        .install()?;

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());
    let listener = TcpListener::bind(&addr).await?;
    info!("Mock conversion service listening on {}", listener.local_addr()?);

    tokio::spawn(mock_service::tps_measure_task());
    mock_service::run(listener).await
}
