//! API route configuration.

use crate::api::handlers::shorten_handler;
use crate::state::AppState;
use axum::{Router, routing::post};

/// Public API routes.
///
/// # Endpoints
///
/// - `POST /v1` - Register a short link (rate-limited per client)
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/v1", post(shorten_handler))
}
