//! Rate-limit counter entity.

use std::time::Duration;

/// Key prefix for per-client quota counters.
pub const QUOTA_KEY_PREFIX: &str = "quota:";

/// Builds the store key holding the counter for `client_id`.
pub fn quota_key(client_id: &str) -> String {
    format!("{QUOTA_KEY_PREFIX}{client_id}")
}

/// Outcome of a successful quota check.
///
/// `remaining` is the number of further calls the client may make in the
/// current window; `reset_after` is the time until the window closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaStatus {
    pub remaining: i64,
    pub reset_after: Duration,
}
