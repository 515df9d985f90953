//! Short link registration service.

use std::sync::Arc;

use crate::application::services::rate_limiter::{DEFAULT_QUOTA, RateLimiter};
use crate::domain::entities::{Link, MAX_EXPIRY_HOURS, NewLink, link_key};
use crate::domain::repositories::{KeyValueStore, StoreConnector};
use crate::error::AppError;
use crate::utils::code_generator::generate_code;
use crate::utils::url_validator::{
    enforce_secure_scheme, is_forbidden_domain, is_valid_url, parse_url,
};
use serde_json::json;
use tracing::{error, info};

/// Attempts at drawing an unused generated code before giving up.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Registration settings, loaded once by the service and injected here.
#[derive(Debug, Clone)]
pub struct ShortenerSettings {
    /// Registrations allowed per client per window.
    pub quota: i64,
    /// Public prefix for short URLs, e.g. `localhost:3000` or `https://sho.rt`.
    pub public_domain: String,
    /// Hosts that may not be shortened (the service's own domain among them).
    pub forbidden_domains: Vec<String>,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self {
            quota: DEFAULT_QUOTA,
            public_domain: "localhost:3000".to_string(),
            forbidden_domains: vec!["localhost:3000".to_string()],
        }
    }
}

/// Service for registering short links under a per-client quota.
///
/// The service is stateless: each call acquires a store handle, runs the
/// checks against it and drops it on return.
pub struct ShortenerService {
    connector: Arc<dyn StoreConnector>,
    rate_limiter: RateLimiter,
    settings: ShortenerSettings,
}

impl ShortenerService {
    /// Creates a new shortener service.
    pub fn new(connector: Arc<dyn StoreConnector>, settings: ShortenerSettings) -> Self {
        Self {
            connector,
            rate_limiter: RateLimiter::new(),
            settings,
        }
    }

    /// Registration settings in effect.
    /// Registers a short link for `client_id`.
    ///
    /// # Order of checks
    ///
    /// 1. URL syntax, denylist and expiry bound (no store access yet)
    /// 2. Scheme upgrade to `https`
    /// 3. Identifier resolution and existence lookup
    /// 4. Rate limit for `client_id`
    /// 5. Write of `{code -> url}` with the resolved expiry
    ///
    /// The final write only succeeds if the code is still free, so two
    /// concurrent registrations of the same code cannot both win. The
    /// loser has already consumed a quota unit at that point.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] / [`AppError::ForbiddenDomain`] on validation failure
    /// - [`AppError::InvalidInput`] if the expiry exceeds [`MAX_EXPIRY_HOURS`]
    /// - [`AppError::IdentifierInUse`] if the code is taken
    /// - [`AppError::RateLimitExceeded`] if the client quota is used up
    /// - [`AppError::Store`] if the store is unreachable before the write
    /// - [`AppError::Internal`] if the final write fails or no free code is found
    pub async fn register(&self, new_link: NewLink, client_id: &str) -> Result<Link, AppError> {
        if !is_valid_url(&new_link.long_url) {
            return Err(invalid_url(&new_link.long_url));
        }

        if is_forbidden_domain(&new_link.long_url, &self.settings.forbidden_domains) {
            return Err(AppError::forbidden_domain(
                "This domain cannot be shortened",
                json!({ "url": new_link.long_url }),
            ));
        }

        let expiry_hours = new_link.resolved_expiry_hours().ok_or_else(|| {
            AppError::invalid_input(
                "Expiry is too long",
                json!({ "expiry": new_link.expiry_hours, "max": MAX_EXPIRY_HOURS }),
            )
        })?;

        let long_url = enforce_secure_scheme(&new_link.long_url);

        let store = self.connector.acquire().await?;

        let code = match new_link.requested_code() {
            Some(custom) => {
                if store.get(&link_key(custom)).await?.is_some() {
                    return Err(identifier_in_use(custom));
                }
                custom.to_string()
            }
            None => self.generate_unique_code(store.as_ref()).await?,
        };

        let quota = self
            .rate_limiter
            .check_and_consume(store.as_ref(), client_id, self.settings.quota)
            .await?;

        let link = Link {
            code,
            long_url,
            expiry_hours,
            quota_remaining: quota.remaining,
            quota_reset: quota.reset_after,
        };

        let written = store
            .set_if_absent(&link_key(&link.code), &link.long_url, link.ttl())
            .await
            .map_err(|e| {
                error!("Failed to save short link {}: {}", link.code, e);
                AppError::internal("Unable to save short link", json!({ "code": link.code }))
            })?;

        if !written {
            return Err(identifier_in_use(&link.code));
        }

        info!(
            "Registered {} -> {} for {} ({}h, {} calls left)",
            link.code, link.long_url, client_id, link.expiry_hours, link.quota_remaining
        );

        Ok(link)
    }

    /// Constructs the public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!(
            "{}/{}",
            self.settings.public_domain.trim_end_matches('/'),
            code
        )
    }

    /// Checks if the store behind this service is reachable.
    pub async fn health_check(&self) -> bool {
        self.connector.health_check().await
    }

    /// Name of the store backend in use.
    pub fn backend(&self) -> &'static str {
        self.connector.backend()
    }

    /// Draws random codes until one is unused.
    ///
    /// Attempts up to [`MAX_CODE_ATTEMPTS`] times before failing.
    async fn generate_unique_code(&self, store: &dyn KeyValueStore) -> Result<String, AppError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_code();

            if store.get(&link_key(&code)).await?.is_none() {
                return Ok(code);
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

/// Builds the `InvalidUrl` error, carrying the parser's reason.
fn invalid_url(input: &str) -> AppError {
    let reason = parse_url(input)
        .err()
        .map_or_else(|| "Invalid URL".to_string(), |e| e.to_string());
    AppError::invalid_url("Invalid URL", json!({ "reason": reason }))
}

fn identifier_in_use(code: &str) -> AppError {
    AppError::identifier_in_use("URL short already in use", json!({ "code": code }))
}
