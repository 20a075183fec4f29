#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use chrono::Utc;
use linkpulse::prelude::*;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tower::Layer;

pub const TEST_BASE_URL: &str = "http://s.test";

/// Link registry kept in memory, enforcing short code uniqueness like the
/// database constraint does.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<Link>>,
    unavailable: AtomicBool,
}

impl InMemoryLinkRepository {
    pub fn insert(&self, short_code: &str, long_url: &str) -> Link {
        let mut links = self.links.lock().unwrap();
        let link = Link::new(
            links.len() as i64 + 1,
            short_code.to_string(),
            long_url.to_string(),
            Utc::now(),
        );
        links.push(link.clone());
        link
    }

    pub fn all(&self) -> Vec<Link> {
        self.links.lock().unwrap().clone()
    }

    /// Makes every subsequent call fail with a storage error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::storage("Database error: connection refused", json!({})));
        }
        Ok(())
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.check_available()?;

        let mut links = self.links.lock().unwrap();
        if links.iter().any(|l| l.short_code == new_link.short_code) {
            return Err(AppError::conflict("Short code already exists", json!({})));
        }

        let link = Link::new(
            links.len() as i64 + 1,
            new_link.short_code,
            new_link.long_url,
            new_link.created_at,
        );
        links.push(link.clone());
        Ok(link)
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        self.check_available()?;

        let links = self.links.lock().unwrap();
        Ok(links.iter().find(|l| l.short_code == short_code).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        self.check_available()?;

        Ok(self.all())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }
}

#[derive(Default)]
pub struct InMemoryClickRepository {
    clicks: Mutex<Vec<Click>>,
}

impl InMemoryClickRepository {
    pub fn all(&self) -> Vec<Click> {
        self.clicks.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClickRepository for InMemoryClickRepository {
    async fn create(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut clicks = self.clicks.lock().unwrap();
        let click = Click::new(
            clicks.len() as i64 + 1,
            new_click.link_id,
            new_click.clicked_at,
            new_click.user_agent,
            new_click.ip_address,
        );
        clicks.push(click.clone());
        Ok(click)
    }

    async fn count_by_link_id(&self, link_id: i64) -> Result<i64, AppError> {
        let clicks = self.clicks.lock().unwrap();
        Ok(clicks.iter().filter(|c| c.link_id == link_id).count() as i64)
    }
}

pub struct TestContext {
    pub state: AppState,
    pub click_receiver: ClickReceiver,
    pub links: Arc<InMemoryLinkRepository>,
    pub clicks: Arc<InMemoryClickRepository>,
}

pub fn create_test_state(queue_capacity: usize) -> TestContext {
    let links = Arc::new(InMemoryLinkRepository::default());
    let clicks = Arc::new(InMemoryClickRepository::default());
    let (click_queue, click_receiver) = ClickQueue::new(queue_capacity);

    let state = AppState::new(links.clone(), clicks.clone(), click_queue, TEST_BASE_URL);

    TestContext {
        state,
        click_receiver,
        links,
        clicks,
    }
}

/// Inserts a fixed peer address, standing in for `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Full application router as served, with a mocked peer address.
pub fn test_app(state: AppState) -> axum::Router {
    linkpulse::routes::router(state).layer(MockConnectInfoLayer)
}
