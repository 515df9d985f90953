//! DTOs for the link shortening endpoint.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::{Link, NewLink};
use crate::error::minutes_ceil;

/// Custom codes must be usable as a URL path segment.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]*$").expect("custom code regex"));

/// Request to shorten a single URL.
///
/// URL syntax is checked by the service, not here, so that a malformed
/// URL is reported as `invalid_url` rather than a generic input error.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    pub url: String,

    /// Optional custom short code. Empty means "generate one".
    #[serde(default)]
    #[validate(length(max = 64))]
    #[validate(regex(path = "*CUSTOM_CODE_REGEX", message = "Only letters, digits, '-' and '_' are allowed"))]
    pub short: Option<String>,

    /// Lifetime in hours; zero or missing means 24.
    #[serde(default)]
    #[validate(range(max = 87_600))]
    pub expiry: Option<u64>,
}

impl From<ShortenRequest> for NewLink {
    fn from(req: ShortenRequest) -> Self {
        NewLink {
            long_url: req.url,
            custom_code: req.short,
            expiry_hours: req.expiry,
        }
    }
}

/// Successful registration.
///
/// `rate_limit` is the remaining number of calls, `rate_limit_reset` the
/// minutes until the quota window resets.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub url: String,
    pub short: String,
    pub code: String,
    pub expiry: u64,
    pub rate_limit: i64,
    pub rate_limit_reset: u64,
}

impl ShortenResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            url: link.long_url,
            short: short_url,
            code: link.code,
            expiry: link.expiry_hours,
            rate_limit: link.quota_remaining,
            rate_limit_reset: minutes_ceil(link.quota_reset),
        }
    }
}
