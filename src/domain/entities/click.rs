//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};

use crate::domain::click_event::ClickEvent;

/// A persisted click on a shortened link.
///
/// Created only by the click worker pool; never mutated or deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl Click {
    /// Creates a new Click instance.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let click = Click::new(
    ///     1,
    ///     42,
    ///     Utc::now(),
    ///     Some("Mozilla/5.0".to_string()),
    ///     Some("192.168.1.1".to_string()),
    /// );
    /// ```
    pub fn new(
        id: i64,
        link_id: i64,
        clicked_at: DateTime<Utc>,
        user_agent: Option<String>,
        ip_address: Option<String>,
    ) -> Self {
        Self {
            id,
            link_id,
            clicked_at,
            user_agent,
            ip_address,
        }
    }
}

/// Input data for recording a new click.
///
/// `clicked_at` is the time the redirect was served, not the time the worker
/// persisted it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClick {
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl From<ClickEvent> for NewClick {
    fn from(event: ClickEvent) -> Self {
        Self {
            link_id: event.link_id,
            clicked_at: event.timestamp,
            user_agent: event.user_agent,
            ip_address: event.ip_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_creation_with_all_fields() {
        let now = Utc::now();
        let click = Click::new(
            1,
            42,
            now,
            Some("Mozilla/5.0".to_string()),
            Some("192.168.1.1".to_string()),
        );

        assert_eq!(click.id, 1);
        assert_eq!(click.link_id, 42);
        assert_eq!(click.clicked_at, now);
        assert_eq!(click.user_agent, Some("Mozilla/5.0".to_string()));
        assert_eq!(click.ip_address, Some("192.168.1.1".to_string()));
    }

    #[test]
    fn test_new_click_from_event_keeps_request_time() {
        let event = ClickEvent::new(7, Some("10.0.0.1".to_string()), Some("curl/8.0"));
        let timestamp = event.timestamp;

        let new_click = NewClick::from(event);

        assert_eq!(new_click.link_id, 7);
        assert_eq!(new_click.clicked_at, timestamp);
        assert_eq!(new_click.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(new_click.ip_address.as_deref(), Some("10.0.0.1"));
    }
}
