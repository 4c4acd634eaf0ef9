#![cfg_attr(docsrs, feature(doc_cfg))]
//! Load generation and measurement for FHIR conversion services.
//!
//! A [`Scenario`] drives an operation (usually [`HttpDispatcher::dispatch`]) a fixed number of
//! times with a bounded number in flight, collects every [`RequestOutcome`], and reduces them
//! into a [`RunSummary`] that can be judged against [`PerformanceThresholds`].
//!
//! ```no_run
//! use fhir_loadtest::prelude::*;
//! use std::num::NonZeroUsize;
//!
//! # async fn run() -> Result<(), LoadTestError> {
//! let session = LoadSession::new(&ClientSettings::default())?;
//! session.health_check("http://localhost:8080/api/v1/health/check").await?;
//!
//! let dispatcher = session.dispatcher(
//!     "http://localhost:8080/api/v1/convert/hl7v2-to-fhir",
//!     r#"{"inputDataFormat":"Hl7v2","inputDataString":"MSH|..."}"#,
//! )?;
//! let run = Scenario::new("smoke", move || {
//!     let dispatcher = dispatcher.clone();
//!     async move { dispatcher.dispatch().await }
//! })
//! .requests(10)
//! .concurrency(NonZeroUsize::new(2).unwrap())
//! .await;
//!
//! println!("{}", run.summary);
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod dispatcher;
mod error;
pub mod scenario;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod thresholds;

#[cfg(test)]
mod test_utils;

pub use collector::ResultCollector;
pub use dispatcher::{ConnectionPool, HttpDispatcher};
pub use error::LoadTestError;
pub use scenario::{ConfigurableScenario, Scenario, ScenarioRun};
pub use scheduler::run_batch;
pub use session::LoadSession;

pub use fhir_loadtest_core::{
    ClientSettings, PerformanceThresholds, RequestOutcome, RunSummary, ScenarioSpec, Verdict,
    Violation,
};

pub mod prelude {
    pub use crate::scenario::{ConfigurableScenario, Scenario, ScenarioRun};
    pub use crate::session::LoadSession;
    pub use crate::thresholds::{evaluate, violations};
    pub use crate::{HttpDispatcher, LoadTestError};

    pub use fhir_loadtest_core::{
        ClientSettings, PerformanceThresholds, RequestOutcome, RunSummary, ScenarioSpec, Verdict,
        Violation,
    };
}
