//! Key-value store contract used by the registration core.

use async_trait::async_trait;
use std::time::Duration;

/// Errors raised by a key-value store backend.
///
/// These are transient faults (unreachable store, malformed reply) and are
/// kept apart from business outcomes such as an exhausted quota.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store operation error: {0}")]
    Operation(String),

    #[error("Malformed value for key '{key}': {value}")]
    Malformed { key: String, value: String },

    #[error("Key not found: {0}")]
    MissingKey(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A single store handle, scoped to one request.
///
/// Values are plain strings and every write carries its own expiry.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - Redis-backed handle
/// - [`crate::infrastructure::store::MemoryStore`] - In-process map for development and tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value for `key`, or `None` if it is missing or expired.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()>;

    /// Writes `value` only if `key` does not exist.
    ///
    /// Returns `true` when the value was written.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<bool>;

    /// Decrements an integer value by one and returns the new value.
    ///
    /// Callers must know the key exists.
    async fn decr(&self, key: &str) -> StoreResult<i64>;

    /// Refreshes the remaining lifetime of `key`.
    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<()>;

    /// Remaining lifetime of `key`.
    ///
    /// `None` when the key is absent or has no expiry.
    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>>;

    /// Removes `key`. Returns `true` if it existed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;
}

/// Hands out per-request store handles.
///
/// A handle is released when it is dropped, so every exit path of a
/// request gives its connection back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Opens a handle for the duration of one request.
    async fn acquire(&self) -> StoreResult<Box<dyn KeyValueStore>>;

    /// Checks if the store backend is reachable.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
