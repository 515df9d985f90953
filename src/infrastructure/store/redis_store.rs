//! Redis-backed key-value store.

use crate::domain::repositories::{KeyValueStore, StoreConnector, StoreError, StoreResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Connects to Redis and hands out per-request handles.
///
/// Uses a `ConnectionManager`, so acquiring a handle is a cheap clone of the
/// multiplexed connection and reconnects are handled by the manager.
#[derive(Clone)]
pub struct RedisConnector {
    manager: ConnectionManager,
}

impl RedisConnector {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)
            .map_err(|e| StoreError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self { manager })
    }
}

#[async_trait]
impl StoreConnector for RedisConnector {
    async fn acquire(&self) -> StoreResult<Box<dyn KeyValueStore>> {
        Ok(Box::new(RedisStore {
            conn: self.manager.clone(),
        }))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.manager.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

/// A single request's Redis handle.
pub struct RedisStore {
    conn: ConnectionManager,
}

fn op_error(command: &str, key: &str, e: redis::RedisError) -> StoreError {
    StoreError::Operation(format!("Redis {} failed for '{}': {}", command, key, e))
}

/// Redis expiries have one-second resolution and reject zero.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| op_error("GET", key, e))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs(ttl))
            .await
            .map_err(|e| op_error("SET", key, e))?;
        debug!("SET {} (TTL: {}s)", key, ttl_secs(ttl));
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs(ttl))
            .query_async(&mut conn)
            .await
            .map_err(|e| op_error("SET NX", key, e))?;
        Ok(reply.is_some())
    }

    async fn decr(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        conn.decr::<_, _, i64>(key, 1)
            .await
            .map_err(|e| op_error("DECR", key, e))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.expire::<_, ()>(key, ttl_secs(ttl) as i64)
            .await
            .map_err(|e| op_error("EXPIRE", key, e))
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>> {
        let mut conn = self.conn.clone();
        let secs: i64 = conn.ttl(key).await.map_err(|e| op_error("TTL", key, e))?;

        // -2: missing key, -1: no expiry
        if secs < 0 {
            return Ok(None);
        }
        Ok(Some(Duration::from_secs(secs as u64)))
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let deleted: i64 = conn.del(key).await.map_err(|e| op_error("DEL", key, e))?;
        Ok(deleted > 0)
    }
}
