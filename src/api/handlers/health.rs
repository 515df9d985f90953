//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{
    CheckState, HealthChecks, HealthResponse, ServiceStatus, StoreCheck,
};
use crate::state::AppState;

/// Returns service health status.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Store reachable
/// - **503 Service Unavailable**: Store unreachable
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "backend": "redis", "message": "redis connected" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store = check_store(&state).await;
    let healthy = store.status == CheckState::Ok;

    let response = HealthResponse {
        status: if healthy {
            ServiceStatus::Healthy
        } else {
            ServiceStatus::Degraded
        },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks { store },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_store(state: &AppState) -> StoreCheck {
    let backend = state.shortener.backend();

    if state.shortener.health_check().await {
        StoreCheck {
            status: CheckState::Ok,
            backend,
            message: format!("{} connected", backend),
        }
    } else {
        StoreCheck {
            status: CheckState::Error,
            backend,
            message: format!("{} connection failed", backend),
        }
    }
}
