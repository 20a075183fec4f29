//! Fixed pool of background workers draining the click queue.
//!
//! Every worker shares one receiver. A worker holds the receiver lock only
//! while waiting for the next event, so persistence runs concurrently across
//! workers and events may be stored out of submission order.
//!
//! # Shutdown
//!
//! [`ClickWorkerPool::shutdown`] cancels the pool's token. The first worker to
//! observe it closes the receiver: producers get
//! [`crate::domain::click_queue::EnqueueOutcome::Closed`] from then on, and
//! the workers keep draining what is already buffered before exiting.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::click_queue::ClickReceiver;
use crate::domain::entities::NewClick;
use crate::domain::repositories::ClickRepository;

type SharedReceiver = Arc<Mutex<mpsc::Receiver<ClickEvent>>>;

#[derive(Debug, Default)]
struct WorkerCounters {
    persisted: AtomicU64,
    failed: AtomicU64,
}

/// Handle to the running click workers.
pub struct ClickWorkerPool {
    handles: Vec<JoinHandle<()>>,
    shutdown: CancellationToken,
    counters: Arc<WorkerCounters>,
}

impl ClickWorkerPool {
    /// Spawns `workers` tasks consuming `receiver`.
    ///
    /// A `workers` value of zero is treated as one.
    pub fn start(
        receiver: ClickReceiver,
        repository: Arc<dyn ClickRepository>,
        workers: usize,
    ) -> Self {
        let workers = workers.max(1);
        let receiver: SharedReceiver = Arc::new(Mutex::new(receiver.inner));
        let shutdown = CancellationToken::new();
        let counters = Arc::new(WorkerCounters::default());

        let handles = (0..workers)
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    receiver.clone(),
                    repository.clone(),
                    shutdown.clone(),
                    counters.clone(),
                ))
            })
            .collect();

        info!(workers, "Click workers started");

        Self {
            handles,
            shutdown,
            counters,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Clicks successfully written so far.
    pub fn persisted(&self) -> u64 {
        self.counters.persisted.load(Ordering::Relaxed)
    }

    /// Clicks discarded after a persistence failure.
    pub fn failed(&self) -> u64 {
        self.counters.failed.load(Ordering::Relaxed)
    }

    /// Stops accepting events, drains the buffer and waits for every worker.
    ///
    /// Returns `false` if the workers did not finish within `grace`; any
    /// still-running worker is left detached.
    pub async fn shutdown(self, grace: Duration) -> bool {
        self.shutdown.cancel();

        match tokio::time::timeout(grace, join_all(self.handles)).await {
            Ok(results) => {
                for result in results {
                    if let Err(e) = result {
                        error!(error = %e, "Click worker terminated abnormally");
                    }
                }
                info!(
                    persisted = self.counters.persisted.load(Ordering::Relaxed),
                    failed = self.counters.failed.load(Ordering::Relaxed),
                    "Click workers drained"
                );
                true
            }
            Err(_) => {
                warn!(
                    grace_secs = grace.as_secs(),
                    "Click workers did not drain within the grace period"
                );
                false
            }
        }
    }
}

async fn run_worker(
    worker_id: usize,
    receiver: SharedReceiver,
    repository: Arc<dyn ClickRepository>,
    shutdown: CancellationToken,
    counters: Arc<WorkerCounters>,
) {
    debug!(worker_id, "Click worker running");

    while let Some(event) = next_event(&receiver, &shutdown).await {
        let link_id = event.link_id;

        match repository.create(NewClick::from(event)).await {
            Ok(click) => {
                counters.persisted.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("clicks_persisted_total").increment(1);
                debug!(worker_id, link_id, click_id = click.id, "Click persisted");
            }
            Err(e) => {
                // No retry: the event is discarded and the worker moves on.
                counters.failed.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("clicks_failed_total").increment(1);
                error!(worker_id, link_id, error = %e, "Failed to persist click event");
            }
        }
    }

    debug!(worker_id, "Click worker stopped");
}

/// Waits for the next event, or `None` once the queue is closed and empty.
async fn next_event(receiver: &SharedReceiver, shutdown: &CancellationToken) -> Option<ClickEvent> {
    let mut rx = receiver.lock().await;

    if shutdown.is_cancelled() {
        rx.close();
        return rx.recv().await;
    }

    tokio::select! {
        event = rx.recv() => event,
        () = shutdown.cancelled() => {
            rx.close();
            rx.recv().await
        }
    }
}
