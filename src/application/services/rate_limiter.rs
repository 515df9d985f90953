//! Per-client quota accounting over a sliding window.

use std::time::Duration;

use crate::domain::entities::{QuotaStatus, quota_key};
use crate::domain::repositories::{KeyValueStore, StoreError};
use crate::error::AppError;
use tracing::{debug, warn};

/// Window length; every successful call pushes the reset this far out.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(30 * 60);

/// Quota used when none (or a non-positive one) is configured.
pub const DEFAULT_QUOTA: i64 = 100;

/// Quota accounting backed by one counter key per client.
///
/// The limiter holds no state of its own; the counter lives in the store
/// under `quota:<client>` with a lifetime equal to the window.
///
/// The read-then-decrement sequence is not atomic. Two concurrent calls
/// from the same client can both observe the last unit, and the counter
/// may then drop below zero. Both still succeed; later calls see a
/// non-positive counter and are rejected until the window resets.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// Creates a limiter with the standard 30 minute window.
    pub fn new() -> Self {
        Self {
            window: RATE_LIMIT_WINDOW,
        }
    }

    /// Checks the quota of `client_id` and consumes one unit if available.
    ///
    /// # Behaviour
    ///
    /// - **First call in a window**: creates the counter at `quota` and
    ///   returns `quota` as remaining. This first call does not consume a
    ///   unit, so a fresh client gets `quota + 1` successful calls per window.
    /// - **Counter above zero**: decrements, refreshes the window and
    ///   returns the previous value minus one.
    /// - **Counter at or below zero**: rejects without touching the counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RateLimitExceeded`] with the time until the counter
    /// expires when the quota is used up.
    /// Returns [`AppError::Store`] if the store fails or holds a non-integer counter.
    pub async fn check_and_consume(
        &self,
        store: &dyn KeyValueStore,
        client_id: &str,
        quota: i64,
    ) -> Result<QuotaStatus, AppError> {
        let quota = if quota > 0 { quota } else { DEFAULT_QUOTA };
        let key = quota_key(client_id);

        let Some(raw) = store.get(&key).await? else {
            store.set(&key, &quota.to_string(), self.window).await?;
            debug!("Quota window opened for {} ({} calls)", client_id, quota);

            return Ok(QuotaStatus {
                remaining: quota,
                reset_after: self.window,
            });
        };

        let remaining: i64 = raw.trim().parse().map_err(|_| StoreError::Malformed {
            key: key.clone(),
            value: raw.clone(),
        })?;

        if remaining <= 0 {
            // A counter that vanished or lost its expiry between the two reads
            // still reports a full window rather than an immediate reset.
            let reset_after = store
                .ttl(&key)
                .await?
                .filter(|ttl| !ttl.is_zero())
                .unwrap_or(self.window);

            warn!(
                "Rate limit exceeded for {} (resets in {}s)",
                client_id,
                reset_after.as_secs()
            );
            return Err(AppError::rate_limited(reset_after));
        }

        store.decr(&key).await?;
        store.expire(&key, self.window).await?;

        Ok(QuotaStatus {
            remaining: remaining - 1,
            reset_after: self.window,
        })
    }
}
