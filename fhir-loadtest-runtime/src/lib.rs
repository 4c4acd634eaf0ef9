//! Command-line runtime for the FHIR converter load tester.
//!
//! Wires configuration and fixture loading, the preflight health check, the console report
//! and result persistence around the `fhir-loadtest` engine.
mod cli;
pub mod config;
mod error;
pub mod fixture;
pub mod persist;
pub mod report;
pub mod runtime;

pub use crate::error::{ErrorKind, RuntimeError};
pub use crate::runtime::{LoadTestRuntime, RunReport};

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "fhir_loadtest=info,fhir_loadtest_runtime=info";
