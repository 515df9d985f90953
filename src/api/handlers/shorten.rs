//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::extract::ClientId;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a short link for one long URL.
///
/// # Endpoint
///
/// `POST /api/v1`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "short": "my-link",   // optional, generated when empty
///   "expiry": 24          // optional, hours
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "url": "https://example.com",
///   "short": "localhost:3000/my-link",
///   "code": "my-link",
///   "expiry": 24,
///   "rate_limit": 99,
///   "rate_limit_reset": 30
/// }
/// ```
///
/// # Errors
///
/// - 400 for malformed bodies, invalid URLs and forbidden domains
/// - 403 if the short code is already in use
/// - 429 with `rate_limit_reset` and `Retry-After` when the quota is used up
/// - 503 / 500 on store faults
pub async fn shorten_handler(
    State(state): State<AppState>,
    ClientId(client_id): ClientId,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::invalid_input("Cannot parse JSON", json!({ "reason": e.body_text() }))
    })?;
    payload.validate()?;

    let link = state
        .shortener
        .register(payload.into(), &client_id)
        .await?;

    let short_url = state.shortener.short_url(&link.code);

    Ok(Json(ShortenResponse::new(link, short_url)))
}
