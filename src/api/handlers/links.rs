//! Handlers for link creation and statistics.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, CreateLinkResponse};
use crate::api::dto::stats::LinkStatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/v1/links`
///
/// # Request Body
///
/// ```json
/// { "long_url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// **201 Created**
///
/// ```json
/// {
///   "short_code": "aB3xYz",
///   "long_url": "https://example.com/some/long/path",
///   "full_short_url": "http://localhost:8080/aB3xYz"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is invalid.
/// Returns 503 Service Unavailable if no free short code was found.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.create_link(&payload.long_url).await?;
    let full_short_url = state
        .link_service
        .get_short_url(&state.base_url, &link.short_code);

    Ok((
        StatusCode::CREATED,
        Json(CreateLinkResponse {
            short_code: link.short_code,
            long_url: link.long_url,
            full_short_url,
        }),
    ))
}

/// Returns the click total of a short link.
///
/// # Endpoint
///
/// `GET /api/v1/links/{code}/stats`
///
/// # Errors
///
/// Returns 404 Not Found if the code does not exist.
pub async fn link_stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LinkStatsResponse>, AppError> {
    let stats = state.stats_service.get_link_stats(&code).await?;

    Ok(Json(stats.into()))
}
