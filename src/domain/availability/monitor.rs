//! Periodic availability check over every registered link.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::probe::Prober;
use super::store::{AvailabilityState, AvailabilityStore};
use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// A change of a link's reachability between two consecutive observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub link_id: i64,
    pub short_code: String,
    pub long_url: String,
    pub from: AvailabilityState,
    pub to: AvailabilityState,
}

/// Outcome of a single check cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// Links probed in this cycle.
    pub checked: usize,
    /// Links observed for the first time (no notification emitted).
    pub baselined: usize,
    pub transitions: Vec<Transition>,
}

/// Background task detecting reachability changes of link targets.
pub struct AvailabilityMonitor {
    links: Arc<dyn LinkRepository>,
    prober: Arc<dyn Prober>,
    store: AvailabilityStore,
    interval: Duration,
    concurrency: usize,
}

impl AvailabilityMonitor {
    /// Creates a monitor polling every `interval`.
    ///
    /// At most `concurrency` probes are in flight at once; `1` probes links
    /// one after another.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        prober: Arc<dyn Prober>,
        interval: Duration,
        concurrency: usize,
    ) -> Self {
        Self {
            links,
            prober,
            store: AvailabilityStore::new(),
            interval,
            concurrency: concurrency.max(1),
        }
    }

    pub fn store(&self) -> &AvailabilityStore {
        &self.store
    }

    /// Runs a cycle immediately, then one per interval, until `shutdown` fires.
    ///
    /// A failed cycle is logged and the loop waits for the next tick.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            concurrency = self.concurrency,
            "Starting availability monitor"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                () = shutdown.cancelled() => break,
                result = self.check_cycle() => {
                    if let Err(e) = result {
                        error!(error = %e, "Failed to retrieve links for availability check");
                    }
                }
            }
        }

        info!("Availability monitor stopped");
    }

    /// Probes every link once and records the observations.
    ///
    /// # Errors
    ///
    /// Returns the registry error if the link list cannot be fetched; no
    /// state is modified in that case.
    pub async fn check_cycle(&self) -> Result<CycleReport, AppError> {
        info!("Starting availability check");

        let links = self.links.list_all().await?;
        let prober = &self.prober;

        let observations: Vec<(Link, AvailabilityState)> = stream::iter(links)
            .map(|link| async move {
                let state = prober.probe(&link.long_url).await;
                (link, state)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = CycleReport {
            checked: observations.len(),
            ..CycleReport::default()
        };

        for (link, current) in observations {
            match self.store.record(link.id, current) {
                None => {
                    report.baselined += 1;
                    info!(
                        link_id = link.id,
                        short_code = %link.short_code,
                        long_url = %link.long_url,
                        state = %current,
                        "Initial availability state recorded"
                    );
                }
                Some(previous) if previous != current => {
                    metrics::counter!("availability_transitions_total").increment(1);
                    warn!(
                        link_id = link.id,
                        short_code = %link.short_code,
                        long_url = %link.long_url,
                        from = %previous,
                        to = %current,
                        "[NOTIFICATION] Link {} ({}) changed from {} to {}",
                        link.short_code,
                        link.long_url,
                        previous,
                        current
                    );
                    report.transitions.push(Transition {
                        link_id: link.id,
                        short_code: link.short_code,
                        long_url: link.long_url,
                        from: previous,
                        to: current,
                    });
                }
                Some(_) => {}
            }
        }

        info!(
            checked = report.checked,
            baselined = report.baselined,
            transitions = report.transitions.len(),
            "Availability check completed"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::availability::probe::MockProber;
    use crate::domain::repositories::MockLinkRepository;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Prober whose answers can be changed between cycles.
    #[derive(Default)]
    struct ScriptedProber {
        answers: Mutex<HashMap<String, AvailabilityState>>,
    }

    impl ScriptedProber {
        fn set(&self, url: &str, state: AvailabilityState) {
            self.answers.lock().unwrap().insert(url.to_string(), state);
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(&self, url: &str) -> AvailabilityState {
            self.answers
                .lock()
                .unwrap()
                .get(url)
                .copied()
                .unwrap_or(AvailabilityState::Inaccessible)
        }
    }

    fn link(id: i64, url: &str) -> Link {
        Link::new(id, format!("code{id:02}"), url.to_string(), Utc::now())
    }

    fn repository_with(links: Vec<Link>) -> MockLinkRepository {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_list_all()
            .returning(move || Ok(links.clone()));
        mock_repo
    }

    fn monitor(repo: MockLinkRepository, prober: Arc<ScriptedProber>) -> AvailabilityMonitor {
        AvailabilityMonitor::new(Arc::new(repo), prober, Duration::from_secs(60), 4)
    }

    #[tokio::test]
    async fn test_first_observation_is_baseline_only() {
        let prober = Arc::new(ScriptedProber::default());
        prober.set("https://up.example", AvailabilityState::Accessible);

        let monitor = monitor(
            repository_with(vec![
                link(1, "https://up.example"),
                link(2, "https://down.example"),
            ]),
            prober,
        );

        let report = monitor.check_cycle().await.unwrap();

        assert_eq!(report.checked, 2);
        assert_eq!(report.baselined, 2);
        assert!(report.transitions.is_empty());
        assert_eq!(monitor.store().get(1), Some(AvailabilityState::Accessible));
        assert_eq!(monitor.store().get(2), Some(AvailabilityState::Inaccessible));
    }

    #[tokio::test]
    async fn test_same_result_emits_nothing() {
        let prober = Arc::new(ScriptedProber::default());
        prober.set("https://up.example", AvailabilityState::Accessible);

        let monitor = monitor(repository_with(vec![link(1, "https://up.example")]), prober);

        monitor.check_cycle().await.unwrap();
        let report = monitor.check_cycle().await.unwrap();

        assert_eq!(report.baselined, 0);
        assert!(report.transitions.is_empty());
    }

    #[tokio::test]
    async fn test_changed_result_emits_one_transition() {
        let prober = Arc::new(ScriptedProber::default());
        prober.set("https://flaky.example", AvailabilityState::Accessible);

        let monitor = monitor(
            repository_with(vec![link(5, "https://flaky.example")]),
            prober.clone(),
        );

        monitor.check_cycle().await.unwrap();

        prober.set("https://flaky.example", AvailabilityState::Inaccessible);
        let report = monitor.check_cycle().await.unwrap();

        assert_eq!(
            report.transitions,
            vec![Transition {
                link_id: 5,
                short_code: "code05".to_string(),
                long_url: "https://flaky.example".to_string(),
                from: AvailabilityState::Accessible,
                to: AvailabilityState::Inaccessible,
            }]
        );

        // Stable again: no further notification.
        let report = monitor.check_cycle().await.unwrap();
        assert!(report.transitions.is_empty());

        prober.set("https://flaky.example", AvailabilityState::Accessible);
        let report = monitor.check_cycle().await.unwrap();
        assert_eq!(report.transitions.len(), 1);
        assert_eq!(report.transitions[0].to, AvailabilityState::Accessible);
    }

    #[tokio::test]
    async fn test_link_added_later_is_baselined() {
        let prober = Arc::new(ScriptedProber::default());
        prober.set("https://a.example", AvailabilityState::Accessible);
        prober.set("https://b.example", AvailabilityState::Inaccessible);

        let cycles = Arc::new(AtomicUsize::new(0));
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_list_all().times(2).returning(move || {
            if cycles.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(vec![link(1, "https://a.example")])
            } else {
                Ok(vec![link(1, "https://a.example"), link(2, "https://b.example")])
            }
        });

        let monitor = monitor(mock_repo, prober);

        monitor.check_cycle().await.unwrap();
        let report = monitor.check_cycle().await.unwrap();

        assert_eq!(report.checked, 2);
        assert_eq!(report.baselined, 1);
        assert!(report.transitions.is_empty());
    }

    #[tokio::test]
    async fn test_registry_failure_aborts_cycle() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_list_all()
            .times(1)
            .returning(|| Err(AppError::storage("connection refused", json!({}))));

        let mut mock_prober = MockProber::new();
        mock_prober.expect_probe().times(0);

        let monitor = AvailabilityMonitor::new(
            Arc::new(mock_repo),
            Arc::new(mock_prober),
            Duration::from_secs(60),
            1,
        );

        let result = monitor.check_cycle().await;

        assert!(matches!(result, Err(AppError::Storage { .. })));
        assert!(monitor.store().is_empty());
    }

    #[tokio::test]
    async fn test_run_checks_immediately_and_stops_on_cancel() {
        let prober = Arc::new(ScriptedProber::default());
        prober.set("https://up.example", AvailabilityState::Accessible);

        let monitor = Arc::new(monitor(
            repository_with(vec![link(1, "https://up.example")]),
            prober,
        ));
        let shutdown = CancellationToken::new();

        let task = tokio::spawn({
            let monitor = monitor.clone();
            let shutdown = shutdown.clone();
            async move { monitor.run(shutdown).await }
        });

        for _ in 0..100 {
            if monitor.store().get(1).is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(monitor.store().get(1), Some(AvailabilityState::Accessible));

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("monitor did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_keeps_ticking_after_failed_cycles() {
        let prober = Arc::new(ScriptedProber::default());
        prober.set("https://up.example", AvailabilityState::Accessible);

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_list_all().returning(move || {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(AppError::storage("connection refused", json!({})))
            } else {
                Ok(vec![link(1, "https://up.example")])
            }
        });

        let monitor = Arc::new(AvailabilityMonitor::new(
            Arc::new(mock_repo),
            prober,
            Duration::from_millis(50),
            1,
        ));
        let shutdown = CancellationToken::new();

        let task = tokio::spawn({
            let monitor = monitor.clone();
            let shutdown = shutdown.clone();
            async move { monitor.run(shutdown).await }
        });

        for _ in 0..200 {
            if monitor.store().get(1).is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(monitor.store().get(1), Some(AvailabilityState::Accessible));
        assert!(calls.load(Ordering::SeqCst) >= 3);

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("monitor did not stop")
            .unwrap();
    }
}
