//! Lock-free, append-only storage for the outcomes of one scenario run.
use fhir_loadtest_core::RequestOutcome;
use metrics_util::AtomicBucket;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Accumulates every [`RequestOutcome`] of a single run.
///
/// Clones share the same storage, so a handle can be moved into each in-flight task.
/// Appends from concurrent tasks are never lost or duplicated. There is no way to remove or
/// modify an outcome once appended.
#[derive(Clone)]
pub struct ResultCollector {
    outcomes: Arc<AtomicBucket<RequestOutcome>>,
    count: Arc<AtomicUsize>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(AtomicBucket::new()),
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn append(&self, outcome: RequestOutcome) {
        self.outcomes.push(outcome);
        self.count.fetch_add(1, Ordering::Release);
    }

    /// Every outcome appended so far. Order is unspecified.
    pub fn snapshot(&self) -> Vec<RequestOutcome> {
        self.outcomes.data()
    }

    pub fn len(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResultCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResultCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCollector")
            .field("len", &self.len())
            .finish()
    }
}
