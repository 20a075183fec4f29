//! Reachability probes for link targets.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, redirect};
use tracing::warn;

use super::store::AvailabilityState;

/// Hard upper bound for a single probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Checks whether a URL is currently reachable.
///
/// Probes never fail: any transport error is an
/// [`AvailabilityState::Inaccessible`] observation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> AvailabilityState;
}

/// HTTP `HEAD` prober.
///
/// Redirects are followed (up to 10) and the final status is classified.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    /// Builds a prober whose requests are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(10))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "-monitor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> AvailabilityState {
        match self.client.head(url).send().await {
            Ok(response) => AvailabilityState::from_status(response.status().as_u16()),
            Err(e) => {
                warn!(url, error = %e, "Probe request failed");
                AvailabilityState::Inaccessible
            }
        }
    }
}
