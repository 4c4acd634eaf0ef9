use crate::ResultCollector;
use fhir_loadtest_core::RequestOutcome;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
#[allow(unused)]
use tracing::{debug, error, trace, warn};

/// Runs `op` exactly `requests` times with at most `concurrency` runs in flight, appending
/// every outcome to `collector`.
///
/// A slot is taken before each run is spawned and given back only once its outcome has been
/// appended. Failures do not stop the batch. Returns the wall-clock time from before the
/// first launch until the last outcome was collected.
pub async fn run_batch<T, F>(
    op: T,
    requests: usize,
    concurrency: NonZeroUsize,
    collector: &ResultCollector,
) -> Duration
where
    T: Fn() -> F,
    F: Future<Output = RequestOutcome> + Send + 'static,
{
    let start = Instant::now();
    let limiter = Arc::new(Semaphore::new(concurrency.get()));
    let mut tasks = JoinSet::new();

    for _ in 0..requests {
        reap_finished(&mut tasks, collector);

        let Ok(permit) = limiter.clone().acquire_owned().await else {
            error!("Concurrency limiter closed; remaining requests are not sent.");
            break;
        };

        let fut = op();
        let collector = collector.clone();
        tasks.spawn(async move {
            let outcome = fut.await;
            collector.append(outcome);
            drop(permit);
        });
    }
    trace!("All {requests} requests launched after {:?}", start.elapsed());

    while let Some(res) = tasks.join_next().await {
        record_join(res, collector);
    }

    start.elapsed()
}

/// Drops every already-finished task from `tasks`, so the set only holds runs in flight.
fn reap_finished(tasks: &mut JoinSet<()>, collector: &ResultCollector) -> usize {
    let mut reaped = 0;
    while let Some(res) = tasks.try_join_next() {
        record_join(res, collector);
        reaped += 1;
    }
    reaped
}

fn record_join(res: Result<(), JoinError>, collector: &ResultCollector) {
    if let Err(err) = res {
        // NOTE: The outcome still has to be counted.
        warn!("Request task did not complete: {err}");
        collector.append(RequestOutcome::transport_failure(
            SystemTime::now(),
            Duration::ZERO,
            format!("Request task did not complete: {err}"),
        ));
    }
}
