//! In-process key-value store for development and tests.

use crate::domain::repositories::{KeyValueStore, StoreConnector, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// A store kept in a process-local map.
///
/// Used when Redis is not configured or unreachable at startup. Expiry is
/// evaluated lazily against the tokio clock, so tests can pause and advance
/// time. Clones share the same map.
///
/// Every operation holds the map lock for its whole duration, which makes
/// `set_if_absent` and `decr` atomic per key.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using in-memory store");
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<String, Entry>>> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Operation("Memory store lock poisoned".to_string()))?;

        let now = Instant::now();
        guard.retain(|_, entry| entry.is_live(now));
        Ok(guard)
    }
}

/// Absolute expiry for `ttl` from now; computed before taking the map lock.
fn deadline(key: &str, ttl: Duration) -> StoreResult<Instant> {
    Instant::now()
        .checked_add(ttl)
        .ok_or_else(|| StoreError::Operation(format!("TTL out of range for '{}'", key)))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock()?.get(key).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let expires_at = deadline(key, ttl)?;
        self.lock()?.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(expires_at),
            },
        );
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<bool> {
        let expires_at = deadline(key, ttl)?;
        let mut entries = self.lock()?;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(expires_at),
            },
        );
        Ok(true)
    }

    async fn decr(&self, key: &str) -> StoreResult<i64> {
        let mut entries = self.lock()?;
        let entry = entries
            .get_mut(key)
            .ok_or_else(|| StoreError::MissingKey(key.to_string()))?;

        let current: i64 = entry.value.parse().map_err(|_| StoreError::Malformed {
            key: key.to_string(),
            value: entry.value.clone(),
        })?;

        let next = current - 1;
        entry.value = next.to_string();
        Ok(next)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<()> {
        let expires_at = deadline(key, ttl)?;
        if let Some(entry) = self.lock()?.get_mut(key) {
            entry.expires_at = Some(expires_at);
        }
        Ok(())
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>> {
        let now = Instant::now();
        Ok(self
            .lock()?
            .get(key)
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now)))
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        Ok(self.lock()?.remove(key).is_some())
    }
}

#[async_trait]
impl StoreConnector for MemoryStore {
    async fn acquire(&self) -> StoreResult<Box<dyn KeyValueStore>> {
        Ok(Box::new(self.clone()))
    }

    async fn health_check(&self) -> bool {
        self.entries.lock().is_ok()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
