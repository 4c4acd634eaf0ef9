#[cfg(feature = "rt")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;

/// One load pattern: how many requests to send and how many may be in flight at once.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize))]
pub struct ScenarioSpec {
    #[cfg_attr(feature = "rt", serde(default))]
    pub description: String,
    pub requests: usize,
    pub concurrency: NonZeroUsize,
}

impl ScenarioSpec {
    pub fn new(requests: usize, concurrency: NonZeroUsize) -> Self {
        Self {
            description: String::new(),
            requests,
            concurrency,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Default for ScenarioSpec {
    fn default() -> Self {
        Self::new(1, NonZeroUsize::MIN)
    }
}

impl fmt::Display for ScenarioSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Requests: {}, Concurrency: {}",
            self.requests, self.concurrency
        )
    }
}

/// The scenario names the CLI accepts. Each must also be defined under `testScenarios`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize, clap::ValueEnum))]
#[cfg_attr(feature = "rt", serde(rename_all = "lowercase"))]
pub enum ScenarioName {
    Smoke,
    Load,
    Stress,
    Spike,
    Endurance,
    Streaming,
}

impl ScenarioName {
    pub const ALL: [ScenarioName; 6] = [
        ScenarioName::Smoke,
        ScenarioName::Load,
        ScenarioName::Stress,
        ScenarioName::Spike,
        ScenarioName::Endurance,
        ScenarioName::Streaming,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioName::Smoke => "smoke",
            ScenarioName::Load => "load",
            ScenarioName::Stress => "stress",
            ScenarioName::Spike => "spike",
            ScenarioName::Endurance => "endurance",
            ScenarioName::Streaming => "streaming",
        }
    }
}

impl fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
