//! Click statistics service.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::Link;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

/// Aggregated statistics of one link.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkStats {
    pub link: Link,
    pub total_clicks: i64,
}

/// Service for retrieving click statistics.
pub struct StatsService {
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
}

impl StatsService {
    /// Creates a new statistics service.
    pub fn new(links: Arc<dyn LinkRepository>, clicks: Arc<dyn ClickRepository>) -> Self {
        Self { links, clicks }
    }

    /// Retrieves the total click count of the link behind `code`.
    ///
    /// Clicks still buffered in the queue are not counted yet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn get_link_stats(&self, code: &str) -> Result<LinkStats, AppError> {
        let link = self
            .links
            .find_by_short_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

        let total_clicks = self.clicks.count_by_link_id(link.id).await?;

        Ok(LinkStats { link, total_clicks })
    }
}
