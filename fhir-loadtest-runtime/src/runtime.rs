//! Default load test runtime
//!
//! Loads the configuration, checks the service is up, runs one scenario against one
//! conversion endpoint and reports the result.
use crate::cli::LoadTestCli;
use crate::config::{load_config, LoadedConfig};
use crate::{fixture::load_payload, persist::save_results, report};
use crate::{report::Report, RuntimeError};
use clap::Parser;
use fhir_loadtest::prelude::*;
use fhir_loadtest_core::{DataType, ScenarioName, Violation, DEFAULT_CONFIG_PATH};
use std::path::{Path, PathBuf};
#[allow(unused)]
use tracing::{debug, error, info, instrument};

/// What a completed run produced.
#[derive(Debug)]
pub struct RunReport {
    pub run: ScenarioRun,
    pub verdict: Verdict,
    pub violations: Vec<Violation>,
    /// Set when results were saved.
    pub results_path: Option<PathBuf>,
}

/// Command-line load test runtime.
///
/// # Example
///
/// ```no_run
/// use fhir_loadtest_runtime::LoadTestRuntime;
///
/// #[tokio::main]
/// async fn main() {
///     let _ = LoadTestRuntime::new()
///         .with_args()
///         .run()
///         .await;
/// }
/// ```
pub struct LoadTestRuntime {
    config_path: PathBuf,
    scenario: String,
    data_type: DataType,
    save_results: bool,
    results_dir: PathBuf,
}

impl Default for LoadTestRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadTestRuntime {
    pub fn new() -> Self {
        LoadTestRuntime {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            scenario: ScenarioName::Smoke.to_string(),
            data_type: DataType::default(),
            save_results: false,
            results_dir: PathBuf::from("."),
        }
    }

    /// Use the command-line arguments.
    ///
    /// ```text
    /// $ fhir-loadtest load --data-type ccda --save-results --config load-test-config.json
    /// ```
    pub fn with_args(self) -> Self {
        self.apply(LoadTestCli::parse())
    }

    fn apply(mut self, args: LoadTestCli) -> Self {
        self.scenario = args.scenario.to_string();
        self.data_type = args.data_type;
        self.save_results = args.save_results;
        self.config_path = args.config;
        self
    }

    pub fn config(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = path.as_ref().to_path_buf();
        self
    }

    /// Any scenario defined under `testScenarios`.
    pub fn scenario(mut self, name: &str) -> Self {
        self.scenario = name.to_string();
        self
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn save_results(mut self, save: bool) -> Self {
        self.save_results = save;
        self
    }

    /// Directory results are saved into. Defaults to the working directory.
    pub fn results_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.results_dir = dir.as_ref().to_path_buf();
        self
    }

    #[instrument(name="fhir-loadtest", skip_all, fields(scenario=%self.scenario, data_type=%self.data_type))]
    pub async fn run(self) -> Result<RunReport, RuntimeError> {
        println!("{}", report::banner());

        let LoadedConfig { config, document } = load_config(&self.config_path).await?;
        let spec = config
            .scenario(&self.scenario)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownScenario(self.scenario.clone()))?;
        let url = config
            .endpoints
            .conversion_url(self.data_type)
            .ok_or(RuntimeError::MissingEndpoint(self.data_type))?;
        let fixture = config
            .test_data_path(self.data_type)
            .ok_or(RuntimeError::MissingTestData(self.data_type))?;
        let payload = load_payload(self.data_type, fixture).await?;

        let session = LoadSession::new(&config.client).map_err(RuntimeError::Session)?;

        println!("Performing health check...");
        session
            .health_check(&config.endpoints.health_url())
            .await
            .map_err(RuntimeError::HealthCheck)?;
        println!("Health check passed!");

        let dispatcher = session
            .dispatcher(&url, payload)
            .map_err(RuntimeError::Session)?;

        println!("{}", report::scenario_header(&self.scenario, &spec));
        let run = Scenario::new(&self.scenario, move || {
            let dispatcher = dispatcher.clone();
            async move { dispatcher.dispatch().await }
        })
        .spec(spec)
        .await;

        let verdict = evaluate(&run.summary, &config.performance_thresholds);
        let violations = violations(&run.summary, &config.performance_thresholds);
        println!("{}", Report::new(&run, verdict, &violations));
        info!("Verdict for {}: {verdict}", self.scenario);

        let results_path = if self.save_results {
            let path = save_results(&self.results_dir, &document, &run.outcomes).await?;
            println!("\nResults saved to: {}", path.display());
            Some(path)
        } else {
            None
        };

        Ok(RunReport {
            run,
            verdict,
            violations,
            results_path,
        })
    }
}
