//! Short link entities: registration input and result.

use std::time::Duration;

/// Key prefix for short link records.
pub const LINK_KEY_PREFIX: &str = "url:";

/// Expiry applied when the caller omits one or sends zero.
pub const DEFAULT_EXPIRY_HOURS: u64 = 24;

/// Longest accepted expiry (ten years).
pub const MAX_EXPIRY_HOURS: u64 = 87_600;

/// Builds the store key holding the destination of `code`.
pub fn link_key(code: &str) -> String {
    format!("{LINK_KEY_PREFIX}{code}")
}

/// Input for registering a new short link.
///
/// `custom_code: None` (or an empty string) asks for a generated identifier.
/// `expiry_hours: None` or `Some(0)` falls back to [`DEFAULT_EXPIRY_HOURS`].
#[derive(Debug, Clone)]
pub struct NewLink {
    pub long_url: String,
    pub custom_code: Option<String>,
    pub expiry_hours: Option<u64>,
}

impl NewLink {
    /// Returns the caller-supplied code, treating an empty string as absent.
    pub fn requested_code(&self) -> Option<&str> {
        self.custom_code.as_deref().filter(|c| !c.is_empty())
    }

    /// Resolved expiry in hours, or `None` if above [`MAX_EXPIRY_HOURS`].
    pub fn resolved_expiry_hours(&self) -> Option<u64> {
        match self.expiry_hours {
            None | Some(0) => Some(DEFAULT_EXPIRY_HOURS),
            Some(hours) if hours <= MAX_EXPIRY_HOURS => Some(hours),
            Some(_) => None,
        }
    }
}

/// A registered short link, as returned to the caller.
///
/// The record itself is just `{code -> long_url}` in the store with a
/// lifetime of `expiry_hours`; nothing else is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub code: String,
    pub long_url: String,
    pub expiry_hours: u64,
    pub quota_remaining: i64,
    pub quota_reset: Duration,
}

impl Link {
    /// Lifetime of the stored record.
    pub fn ttl(&self) -> Duration {
        expiry_ttl(self.expiry_hours)
    }
}

/// Converts an expiry in hours to a store lifetime.
pub fn expiry_ttl(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(3600))
}
