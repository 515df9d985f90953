//! Response body for `GET /health`.

use serde::Serialize;

/// Overall service state; `degraded` whenever the store is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

/// Result of pinging a single dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: &'static str,
    pub checks: HealthChecks,
}

/// The store is the only dependency; links and quotas both live there.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub store: StoreCheck,
}

/// Store reachability plus the backend that answered (`redis` or `memory`).
#[derive(Debug, Serialize)]
pub struct StoreCheck {
    pub status: CheckState,
    pub backend: &'static str,
    pub message: String,
}
