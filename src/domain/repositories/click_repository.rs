//! Repository trait for click persistence.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable store of [`Click`] records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Records a click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors, including a
    /// `link_id` that does not reference an existing link.
    async fn create(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Counts clicks recorded for a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn count_by_link_id(&self, link_id: i64) -> Result<i64, AppError>;
}
