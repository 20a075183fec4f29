//! Last-known reachability of each link target.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Reachability classification of a link's target URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvailabilityState {
    Accessible,
    Inaccessible,
}

impl AvailabilityState {
    /// Classifies an HTTP status code; `[200, 400)` counts as reachable.
    pub fn from_status(status: u16) -> Self {
        if (200..400).contains(&status) {
            Self::Accessible
        } else {
            Self::Inaccessible
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accessible => "ACCESSIBLE",
            Self::Inaccessible => "INACCESSIBLE",
        }
    }
}

impl fmt::Display for AvailabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synchronized map of link id to last observed [`AvailabilityState`].
///
/// Held in memory only. A link without an entry is in the implicit "unknown"
/// state, which is also where every link starts after a restart.
#[derive(Debug, Default)]
pub struct AvailabilityStore {
    states: Mutex<HashMap<i64, AvailabilityState>>,
}

impl AvailabilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `state` for `link_id` and returns the state it replaced.
    ///
    /// The read and the write happen under one lock acquisition.
    pub fn record(&self, link_id: i64, state: AvailabilityState) -> Option<AvailabilityState> {
        self.lock().insert(link_id, state)
    }

    pub fn get(&self, link_id: i64) -> Option<AvailabilityState> {
        self.lock().get(&link_id).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<i64, AvailabilityState>> {
        // The map holds plain values, so a panic elsewhere cannot leave it half-written.
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_from_status_boundaries() {
        assert_eq!(AvailabilityState::from_status(199), AvailabilityState::Inaccessible);
        assert_eq!(AvailabilityState::from_status(200), AvailabilityState::Accessible);
        assert_eq!(AvailabilityState::from_status(302), AvailabilityState::Accessible);
        assert_eq!(AvailabilityState::from_status(399), AvailabilityState::Accessible);
        assert_eq!(AvailabilityState::from_status(400), AvailabilityState::Inaccessible);
        assert_eq!(AvailabilityState::from_status(503), AvailabilityState::Inaccessible);
    }

    #[test]
    fn test_record_returns_previous_state() {
        let store = AvailabilityStore::new();

        assert_eq!(store.record(1, AvailabilityState::Accessible), None);
        assert_eq!(
            store.record(1, AvailabilityState::Inaccessible),
            Some(AvailabilityState::Accessible)
        );
        assert_eq!(store.get(1), Some(AvailabilityState::Inaccessible));
        assert_eq!(store.get(2), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_records_see_every_previous_value() {
        let store = Arc::new(AvailabilityStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let mut baselines = 0;
                    for _ in 0..1000 {
                        if store.record(7, AvailabilityState::Accessible).is_none() {
                            baselines += 1;
                        }
                    }
                    baselines
                })
            })
            .collect();

        let baselines: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(baselines, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(AvailabilityState::Accessible.to_string(), "ACCESSIBLE");
        assert_eq!(AvailabilityState::Inaccessible.to_string(), "INACCESSIBLE");
    }
}
