use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub const HL7V2_PATH: &str = "/api/v1/convert/hl7v2-to-fhir";

pub const SAMPLE_ADT: &str = "MSH|^~\\&|SIMHOSP|SFAC|RAPP|RFAC|20200508131015||ADT^A01|517|T|2.3|||AL||44|ASCII\rPID|1|2590157853^^^SIMULATOR MRN^MRN||Esterkin^AKI^^^^^L";

/// Installs the log subscriber and the metrics recorder once per test binary.
#[allow(unused)]
pub fn init() -> &'static PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    HANDLE.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_panic(info);
            error!("Panic occurred: {info:?}");
        }));

        let _ = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    EnvFilter::new("fhir_loadtest=debug,fhir_loadtest_runtime=debug,mock_service=debug")
                }),
            )
            .with_test_writer()
            .try_init();

        PrometheusBuilder::new().install_recorder().unwrap()
    })
}

/// Starts a fresh mock conversion service and returns its base URL.
#[allow(unused)]
pub async fn spawn_mock() -> String {
    let addr: SocketAddr = mock_service::spawn().await.unwrap();
    format!("http://{addr}")
}

#[allow(unused)]
pub fn write_fixture(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("sample-adt.hl7");
    std::fs::write(&path, contents).unwrap();
    path
}

/// A config with a single `smoke` scenario against `base_url`, written into `dir`.
#[allow(unused)]
pub fn write_config(
    dir: &Path,
    base_url: &str,
    health: &str,
    hl7v2: &str,
    fixture: &Path,
    requests: usize,
    concurrency: usize,
) -> PathBuf {
    let config = serde_json::json!({
        "endpoints": {
            "baseUrl": base_url,
            "health": health,
            "hl7v2": hl7v2,
        },
        "testScenarios": {
            "smoke": {
                "description": "Basic functionality test",
                "requests": requests,
                "concurrency": concurrency,
            }
        },
        "testData": { "hl7v2": fixture },
        "performanceThresholds": {
            "maxResponseTimeMs": 1000,
            "maxErrorRate": 0.01,
            "minThroughputRps": 1,
        },
        "client": { "timeoutSeconds": 5 }
    });

    let path = dir.join("load-test-config.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&config).unwrap()).unwrap();
    path
}
