//! Scenario driver
use crate::{run_batch, stats, ResultCollector};
use fhir_loadtest_core::{RequestOutcome, RunSummary, ScenarioSpec};
use std::{
    future::Future,
    num::NonZeroUsize,
    pin::Pin,
    task::{Context, Poll},
};
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// A named load scenario, run by awaiting it.
///
/// `func` is invoked once per request; each returned future is one request. Defaults to a
/// single request with a concurrency of 1; use [`ConfigurableScenario`] to change that.
#[pin_project::pin_project]
pub struct Scenario<T> {
    func: T,
    runner_fut: Option<Pin<Box<dyn Future<Output = ScenarioRun> + Send>>>,
    name: String,
    spec: ScenarioSpec,
}

impl<T> Scenario<T> {
    pub fn new(name: &str, func: T) -> Self {
        Self {
            func,
            runner_fut: None,
            name: name.to_string(),
            spec: ScenarioSpec::default(),
        }
    }
}

/// Everything produced by one run of a scenario.
#[derive(Clone, Debug)]
pub struct ScenarioRun {
    pub name: String,
    pub spec: ScenarioSpec,
    pub summary: RunSummary,
    pub outcomes: Vec<RequestOutcome>,
}

impl<T, F> Future for Scenario<T>
where
    T: Fn() -> F + Send + 'static + Clone + Sync,
    F: Future<Output = RequestOutcome> + Send + 'static,
{
    type Output = ScenarioRun;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.runner_fut.is_none() {
            let func = self.func.clone();
            let name = self.name.clone();
            let spec = self.spec.clone();
            self.runner_fut = Some(Box::pin(async move { run_scenario(func, name, spec).await }));
        }

        if let Some(runner) = &mut self.runner_fut {
            runner.as_mut().poll(cx)
        } else {
            unreachable!()
        }
    }
}

pub trait ConfigurableScenario<T: Send>: Future<Output = T> + Sized + Send {
    fn spec(self, spec: ScenarioSpec) -> Self;
    fn requests(self, requests: usize) -> Self;
    fn concurrency(self, concurrency: NonZeroUsize) -> Self;
    fn description(self, description: &str) -> Self;
}

impl<T, F> ConfigurableScenario<ScenarioRun> for Scenario<T>
where
    T: Fn() -> F + Send + 'static + Clone + Sync,
    F: Future<Output = RequestOutcome> + Send + 'static,
{
    /// Take requests, concurrency and description from a configured scenario.
    ///
    /// # Example
    /// ```no_run
    /// use fhir_loadtest::prelude::*;
    /// use std::num::NonZeroUsize;
    /// use std::time::{Duration, SystemTime};
    ///
    /// # async fn run() {
    /// let spec = ScenarioSpec::new(1000, NonZeroUsize::new(10).unwrap())
    ///     .with_description("Normal load test");
    /// let run = Scenario::new("load", || async {
    ///     RequestOutcome::response(SystemTime::now(), Duration::ZERO, 200, String::new())
    /// })
    /// .spec(spec)
    /// .await;
    /// # }
    /// ```
    fn spec(mut self, spec: ScenarioSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Total number of requests to send.
    fn requests(mut self, requests: usize) -> Self {
        self.spec.requests = requests;
        self
    }

    /// Upper bound on requests in flight at once.
    fn concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.spec.concurrency = concurrency;
        self
    }

    fn description(mut self, description: &str) -> Self {
        self.spec.description = description.to_string();
        self
    }
}

#[instrument(name="scenario", skip_all, fields(name=%name))]
pub(crate) async fn run_scenario<T, F>(func: T, name: String, spec: ScenarioSpec) -> ScenarioRun
where
    T: Fn() -> F + Send + Sync + 'static + Clone,
    F: Future<Output = RequestOutcome> + Send + 'static,
{
    info!("Running {name} scenario ({spec})");

    let collector = ResultCollector::new();
    let duration = run_batch(func, spec.requests, spec.concurrency, &collector).await;

    let outcomes = collector.snapshot();
    let summary = stats::reduce(&outcomes, duration);

    info!(
        "Scenario {name} complete after {}: {summary}",
        humantime::format_duration(duration)
    );

    ScenarioRun {
        name,
        spec,
        summary,
        outcomes,
    }
}
