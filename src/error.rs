//! Application error type and its HTTP mapping.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;

use crate::domain::repositories::StoreError;

/// Response envelope: `{"error": {...}, "rate_limit_reset": 12}`.
///
/// `rate_limit_reset` (minutes) sits next to `error` and is only present on
/// rate-limit rejections.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_reset: Option<u64>,
}

/// Serializable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors surfaced by the registration flow.
///
/// Everything except [`AppError::Store`] and [`AppError::Internal`] is an
/// expected business outcome returned to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    InvalidInput { message: String, details: Value },

    #[error("{message}")]
    InvalidUrl { message: String, details: Value },

    #[error("{message}")]
    ForbiddenDomain { message: String, details: Value },

    #[error("{message}")]
    IdentifierInUse { message: String, details: Value },

    #[error("Rate limit exceeded")]
    RateLimitExceeded { reset_after: Duration },

    #[error("{message}")]
    Store { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden_domain(message: impl Into<String>, details: Value) -> Self {
        Self::ForbiddenDomain {
            message: message.into(),
            details,
        }
    }
    pub fn identifier_in_use(message: impl Into<String>, details: Value) -> Self {
        Self::IdentifierInUse {
            message: message.into(),
            details,
        }
    }
    pub fn rate_limited(reset_after: Duration) -> Self {
        Self::RateLimitExceeded { reset_after }
    }
    pub fn store(message: impl Into<String>, details: Value) -> Self {
        Self::Store {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } | Self::InvalidUrl { .. } | Self::ForbiddenDomain { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::IdentifierInUse { .. } => StatusCode::FORBIDDEN,
            Self::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Store { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the serializable payload for this error.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, details) = match self {
            Self::InvalidInput { details, .. } => ("invalid_input", details.clone()),
            Self::InvalidUrl { details, .. } => ("invalid_url", details.clone()),
            Self::ForbiddenDomain { details, .. } => ("forbidden_domain", details.clone()),
            Self::IdentifierInUse { details, .. } => ("identifier_in_use", details.clone()),
            Self::RateLimitExceeded { reset_after } => (
                "rate_limit_exceeded",
                json!({ "reset_in_seconds": reset_after.as_secs() }),
            ),
            Self::Store { details, .. } => ("store_unavailable", details.clone()),
            Self::Internal { details, .. } => ("internal_error", details.clone()),
        };

        ErrorInfo {
            code,
            message: self.to_string(),
            details,
        }
    }

    /// Builds the full response envelope for this error.
    pub fn to_error_body(&self) -> ErrorBody {
        let rate_limit_reset = match self {
            Self::RateLimitExceeded { reset_after } => Some(minutes_ceil(*reset_after)),
            _ => None,
        };

        ErrorBody {
            error: self.to_error_info(),
            rate_limit_reset,
        }
    }
}

/// Rounds a duration up to whole minutes so a pending reset never reads as zero.
pub fn minutes_ceil(duration: Duration) -> u64 {
    duration.as_secs().div_ceil(60)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retry_after = match &self {
            Self::RateLimitExceeded { reset_after } => Some(reset_after.as_secs().max(1)),
            _ => None,
        };

        let mut response = (status, Json(self.to_error_body())).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        tracing::error!("Store error: {}", e);
        AppError::store("Unable to reach the store", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or_else(|_| json!({}));
        AppError::invalid_input("Request validation failed", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::invalid_url("bad", json!({})).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::identifier_in_use("taken", json!({})).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::rate_limited(Duration::from_secs(60)).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::store("down", json!({})).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::internal("boom", json!({})).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_reset_only_on_rate_limit() {
        let value =
            serde_json::to_value(AppError::rate_limited(Duration::from_secs(90)).to_error_body())
                .unwrap();
        assert_eq!(value["error"]["code"], "rate_limit_exceeded");
        assert_eq!(value["rate_limit_reset"], 2);
        assert!(value["error"].get("rate_limit_reset").is_none());

        let value =
            serde_json::to_value(AppError::identifier_in_use("taken", json!({})).to_error_body())
                .unwrap();
        assert_eq!(value["error"]["code"], "identifier_in_use");
        assert!(value.get("rate_limit_reset").is_none());
    }

    #[test]
    fn test_minutes_ceil() {
        assert_eq!(minutes_ceil(Duration::from_secs(0)), 0);
        assert_eq!(minutes_ceil(Duration::from_secs(1)), 1);
        assert_eq!(minutes_ceil(Duration::from_secs(1800)), 30);
        assert_eq!(minutes_ceil(Duration::from_secs(1801)), 31);
    }

    #[test]
    fn test_rate_limit_response_sets_retry_after() {
        let response = AppError::rate_limited(Duration::from_secs(120)).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "120");
    }

    #[test]
    fn test_store_error_conversion() {
        let err: AppError = StoreError::Connection("refused".to_string()).into();
        assert!(matches!(err, AppError::Store { .. }));
    }
}
