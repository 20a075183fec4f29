//! Link creation and retrieval service.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{SHORT_CODE_LENGTH, generate_code};

/// Number of codes tried before [`LinkService::create_link`] gives up.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Service for creating and retrieving shortened links.
///
/// Each new link receives a freshly generated random code. Uniqueness is
/// checked with a lookup before the insert, and the store's unique constraint
/// catches the window between the two.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(links: Arc<dyn LinkRepository>) -> Self {
        Self { links }
    }

    /// Creates a short link for `long_url`.
    ///
    /// The URL is stored as given. Callers are expected to have validated it.
    ///
    /// # Code Generation
    ///
    /// Up to [`MAX_CODE_ATTEMPTS`] six-character codes are generated. A code
    /// already present in the registry counts as a collision and the next
    /// attempt starts. An insert rejected by the unique constraint (another
    /// creator took the same code in between) is treated the same way.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeExhausted`] if every attempt collided.
    /// Returns [`AppError::RandomSource`] if the entropy source fails.
    /// Returns [`AppError::Storage`] if a lookup or the insert fails.
    pub async fn create_link(&self, long_url: &str) -> Result<Link, AppError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let short_code = generate_code(SHORT_CODE_LENGTH)?;

            if self.links.find_by_short_code(&short_code).await?.is_some() {
                metrics::counter!("short_code_collisions_total").increment(1);
                warn!(attempt, short_code = %short_code, "Short code collision, retrying");
                continue;
            }

            let new_link = NewLink {
                short_code: short_code.clone(),
                long_url: long_url.to_string(),
                created_at: Utc::now(),
            };

            match self.links.create(new_link).await {
                Ok(link) => {
                    info!(
                        link_id = link.id,
                        short_code = %link.short_code,
                        long_url = %link.long_url,
                        "Short link created"
                    );
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) => {
                    metrics::counter!("short_code_collisions_total").increment(1);
                    warn!(
                        attempt,
                        short_code = %short_code,
                        "Short code taken by a concurrent insert, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        error!(
            attempts = MAX_CODE_ATTEMPTS,
            long_url, "Could not find an unused short code"
        );

        Err(AppError::CodeExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn get_link_by_code(&self, code: &str) -> Result<Link, AppError> {
        self.links
            .find_by_short_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Constructs the public short URL for `code` under `base_url`.
    pub fn get_short_url(&self, base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }

    /// Checks that the link registry is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.links.ping().await
    }
}
