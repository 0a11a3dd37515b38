//! Handler for the shortening endpoint.

use axum::{Json, extract::State};
use tokio::time::Instant;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL for the submitted original URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "original_url": "https://example.com/some/long/path" }
/// ```
///
/// `originalUrl` is accepted as an alias.
///
/// # Response
///
/// `200 OK`
///
/// ```json
/// {
///   "id": 1,
///   "code": "aZ3kP9",
///   "original_url": "https://example.com/some/long/path",
///   "short_url": "http://localhost:3000/aZ3kP9",
///   "created_at": "2024-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the URL is blank, malformed or longer than 2048 characters
/// - 503 if no free code was found within the retry budget or the deadline
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let deadline = Instant::now() + state.shorten_timeout;
    let mapping = state
        .mapping_service
        .shorten_with_deadline(&payload.original_url, Some(deadline))
        .await?;

    Ok(Json(ShortenResponse::from_mapping(mapping, &state.base_url)))
}
