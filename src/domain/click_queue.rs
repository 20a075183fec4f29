//! Bounded click event queue with drop-on-full backpressure.
//!
//! The redirect path must never wait on analytics. [`ClickQueue::enqueue`]
//! therefore never blocks: when the buffer is full the event is shed, logged
//! and counted. Completeness of click data is traded for redirect latency.
//!
//! Drops are always visible through [`ClickQueue::dropped`] and `/health`.
//! The `metrics` counters emitted here (and by the workers, the link service
//! and the availability monitor) are no-ops unless the embedding process
//! installs a `metrics` recorder; this crate does not install one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

use crate::domain::click_event::ClickEvent;

/// Result of a non-blocking enqueue attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The event is buffered and will be persisted by a worker.
    Queued,
    /// The buffer was full; the event was discarded.
    Dropped,
    /// The consumers are shutting down; the event was discarded.
    Closed,
}

#[derive(Debug, Default)]
struct QueueCounters {
    enqueued: AtomicU64,
    dropped: AtomicU64,
}

/// Producer handle of the click pipeline.
///
/// Cheap to clone; every clone feeds the same bounded buffer.
#[derive(Debug, Clone)]
pub struct ClickQueue {
    sender: mpsc::Sender<ClickEvent>,
    counters: Arc<QueueCounters>,
}

/// Consumer side of a [`ClickQueue`], handed to
/// [`crate::domain::click_worker::ClickWorkerPool::start`].
#[derive(Debug)]
pub struct ClickReceiver {
    pub(crate) inner: mpsc::Receiver<ClickEvent>,
}

impl ClickQueue {
    /// Creates a queue holding at most `capacity` pending events.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> (Self, ClickReceiver) {
        let (sender, receiver) = mpsc::channel(capacity);

        let queue = Self {
            sender,
            counters: Arc::new(QueueCounters::default()),
        };

        (queue, ClickReceiver { inner: receiver })
    }

    /// Attempts to buffer a click event without waiting.
    pub fn enqueue(&self, event: ClickEvent) -> EnqueueOutcome {
        match self.sender.try_send(event) {
            Ok(()) => {
                self.counters.enqueued.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("clicks_enqueued_total").increment(1);
                EnqueueOutcome::Queued
            }
            Err(TrySendError::Full(event)) => {
                let dropped = self.counters.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                metrics::counter!("clicks_dropped_total", "reason" => "full").increment(1);
                warn!(
                    link_id = event.link_id,
                    capacity = self.capacity(),
                    dropped_total = dropped,
                    "Click queue is full, dropping click event"
                );
                EnqueueOutcome::Dropped
            }
            Err(TrySendError::Closed(event)) => {
                let dropped = self.counters.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                metrics::counter!("clicks_dropped_total", "reason" => "closed").increment(1);
                warn!(
                    link_id = event.link_id,
                    dropped_total = dropped,
                    "Click queue is closed, dropping click event"
                );
                EnqueueOutcome::Closed
            }
        }
    }

    /// Maximum number of buffered events.
    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// Number of events currently waiting for a worker.
    pub fn len(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true once the consumer side has been closed or dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Total events accepted since creation.
    pub fn enqueued(&self) -> u64 {
        self.counters.enqueued.load(Ordering::Relaxed)
    }

    /// Total events shed since creation.
    pub fn dropped(&self) -> u64 {
        self.counters.dropped.load(Ordering::Relaxed)
    }
}

impl ClickReceiver {
    /// Number of buffered events not yet taken by a worker.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
