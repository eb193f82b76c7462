//! Redis Store
//!
//! PoolStore implementation over a Redis instance, the deployment-mode
//! backend. Uses a multiplexed async connection so the handle can be
//! shared across tasks without pooling.

use async_trait::async_trait;
use redis::AsyncCommands;

use super::PoolStore;
use crate::error::{PoolError, Result};

/// Pool store backed by Redis.
pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    /// Creates a store from a Redis URL (e.g. `redis://localhost:6379`).
    ///
    /// Connection establishment is deferred to the first operation, so a
    /// bad URL is the only error surfaced here.
    pub fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| PoolError::StoreUnavailable(e.to_string()))?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| PoolError::StoreUnavailable(e.to_string()))
    }
}

#[async_trait]
impl PoolStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;
        conn.get(key)
            .await
            .map_err(|e| PoolError::StoreUnavailable(e.to_string()))
    }

    async fn set(&self, key: &str, blob: Vec<u8>) -> Result<()> {
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(key, blob)
            .await
            .map_err(|e| PoolError::StoreUnavailable(e.to_string()))
    }
}
