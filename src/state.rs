//! Shared application state injected into HTTP handlers.

use std::sync::Arc;

use crate::application::services::{LinkService, StatsService};
use crate::domain::click_queue::ClickQueue;
use crate::domain::repositories::{ClickRepository, LinkRepository};

/// State cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub stats_service: Arc<StatsService>,
    /// Producer side of the click pipeline.
    pub click_queue: ClickQueue,
    /// Prefix for the short URLs returned to clients.
    pub base_url: String,
}

impl AppState {
    /// Wires the services over the given repositories.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        clicks: Arc<dyn ClickRepository>,
        click_queue: ClickQueue,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(links.clone())),
            stats_service: Arc::new(StatsService::new(links, clicks)),
            click_queue,
            base_url: base_url.into(),
        }
    }
}
