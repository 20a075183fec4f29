//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`                    - Health check: database, click queue
//! - `POST /api/v1/links`              - Create a short link
//! - `GET  /api/v1/links/{code}/stats` - Click total for a link
//! - `GET  /{code}`                    - Short link redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routes with their state and request tracing.
///
/// The redirect handler reads the peer address, so the router must be served
/// with connect info (see [`crate::server::run`]).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api::routes::v1_routes())
        .route("/{code}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with path normalization applied.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
