//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

/// An in-memory representation of a redirect, queued for persistence.
///
/// Produced by the redirect handler and handed to the
/// [`crate::domain::click_queue::ClickQueue`]. A worker converts it into a
/// [`crate::domain::entities::NewClick`]; the event itself is never stored.
///
/// Client metadata is optional so missing headers do not block tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub timestamp: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(42, Some("192.168.1.1".to_string()), Some("Mozilla/5.0"));
    /// ```
    pub fn new(link_id: i64, ip_address: Option<String>, user_agent: Option<&str>) -> Self {
        Self {
            link_id,
            timestamp: Utc::now(),
            user_agent: user_agent.map(|s| s.to_string()),
            ip_address,
        }
    }
}
