mod utils;
#[allow(unused)]
use utils::*;

mod tests {
    use super::*;

    use fhir_loadtest_core::{DataType, Verdict};
    use fhir_loadtest_runtime::{ErrorKind, LoadTestRuntime, RuntimeError};
    use serde_json::Value;

    const HEALTH: &str = "/api/v1/health/check";

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ntest::timeout(30_000)]
    async fn smoke_run_saves_results() {
        init();
        let base = spawn_mock().await;
        let dir = tempfile::tempdir().unwrap();
        let fixture = write_fixture(dir.path(), &format!("\n{SAMPLE_ADT}\n\n"));
        let config = write_config(dir.path(), &base, HEALTH, HL7V2_PATH, &fixture, 10, 2);

        let report = LoadTestRuntime::new()
            .config(&config)
            .scenario("smoke")
            .data_type(DataType::Hl7v2)
            .save_results(true)
            .results_dir(dir.path())
            .run()
            .await
            .unwrap();

        assert_eq!(report.run.name, "smoke");
        assert_eq!(report.run.summary.total_requests, 10);
        assert_eq!(report.run.summary.success_count, 10);
        assert_eq!(report.verdict, Verdict::Pass);
        assert!(report.violations.is_empty());

        let path = report.results_path.unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
        let saved: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(saved["timestamp"].is_string());
        assert_eq!(saved["config"]["endpoints"]["baseUrl"], base.as_str());
        assert_eq!(saved["config"]["testScenarios"]["smoke"]["requests"], 10);
        let written: Value = serde_json::from_slice(&std::fs::read(&config).unwrap()).unwrap();
        assert_eq!(saved["config"], written);

        let results = saved["results"].as_array().unwrap();
        assert_eq!(results.len(), 10);
        for result in results {
            assert_eq!(result["statusCode"], 200);
            assert_eq!(result["succeeded"], true);
            assert_eq!(result["errorDetail"], "");
            assert!(result["latencyMs"].as_f64().unwrap() >= 0.);
            assert!(result["issuedAt"].as_f64().unwrap() > 0.);
        }
    }

    #[tokio::test]
    #[ntest::timeout(30_000)]
    async fn failing_thresholds_still_complete() {
        init();
        let base = spawn_mock().await;
        let dir = tempfile::tempdir().unwrap();
        let fixture = write_fixture(dir.path(), SAMPLE_ADT);
        let config = write_config(
            dir.path(),
            &base,
            HEALTH,
            "/flaky/3/scenario/failing_thresholds_still_complete/api/v1/convert/hl7v2-to-fhir",
            &fixture,
            5,
            1,
        );

        let report = LoadTestRuntime::new()
            .config(&config)
            .run()
            .await
            .unwrap();

        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.run.summary.failure_count, 3);
        assert_eq!(
            mock_service::flaky_calls("failing_thresholds_still_complete"),
            5
        );
        assert!(report.results_path.is_none());
        assert!(!report.violations.is_empty());
    }

    #[tokio::test]
    #[ntest::timeout(30_000)]
    async fn unhealthy_service_sends_no_load() {
        init();
        let base = spawn_mock().await;
        let dir = tempfile::tempdir().unwrap();
        let fixture = write_fixture(dir.path(), SAMPLE_ADT);
        let config = write_config(
            dir.path(),
            &base,
            "/unhealthy/api/v1/health/check",
            "/flaky/1/scenario/unhealthy_service_sends_no_load/api/v1/convert/hl7v2-to-fhir",
            &fixture,
            5,
            1,
        );

        let err = LoadTestRuntime::new()
            .config(&config)
            .run()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HealthCheck);
        assert!(err.to_string().contains("503"));
        assert_eq!(mock_service::flaky_calls("unhealthy_service_sends_no_load"), 0);
    }

    #[tokio::test]
    #[ntest::timeout(30_000)]
    async fn unreachable_service() {
        init();
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let dir = tempfile::tempdir().unwrap();
        let fixture = write_fixture(dir.path(), SAMPLE_ADT);
        let config = write_config(dir.path(), &base, HEALTH, HL7V2_PATH, &fixture, 5, 1);

        let err = LoadTestRuntime::new()
            .config(&config)
            .run()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HealthCheck);
    }

    #[tokio::test]
    async fn missing_config() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let err = LoadTestRuntime::new()
            .config(dir.path().join("load-test-config.json"))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::ConfigRead { .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn missing_fixture() {
        init();
        let base = spawn_mock().await;
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            dir.path(),
            &base,
            HEALTH,
            HL7V2_PATH,
            &dir.path().join("missing.hl7"),
            5,
            1,
        );

        let err = LoadTestRuntime::new()
            .config(&config)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::FixtureRead { .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn unknown_scenario() {
        init();
        let base = spawn_mock().await;
        let dir = tempfile::tempdir().unwrap();
        let fixture = write_fixture(dir.path(), SAMPLE_ADT);
        let config = write_config(dir.path(), &base, HEALTH, HL7V2_PATH, &fixture, 5, 1);

        let err = LoadTestRuntime::new()
            .config(&config)
            .scenario("streaming")
            .run()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Unknown scenario: streaming");
    }

    #[tokio::test]
    async fn missing_test_data_for_data_type() {
        init();
        let base = spawn_mock().await;
        let dir = tempfile::tempdir().unwrap();
        let fixture = write_fixture(dir.path(), SAMPLE_ADT);
        let config = write_config(dir.path(), &base, HEALTH, HL7V2_PATH, &fixture, 5, 1);

        let mut value: Value = serde_json::from_slice(&std::fs::read(&config).unwrap()).unwrap();
        value["endpoints"]["json"] = Value::from("/api/v1/convert/json-to-fhir");
        std::fs::write(&config, value.to_string()).unwrap();

        let err = LoadTestRuntime::new()
            .config(&config)
            .data_type(DataType::Json)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::MissingTestData(DataType::Json)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
