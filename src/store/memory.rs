//! In-Memory Store
//!
//! PoolStore implementation over a process-local map. Local-development
//! backend (runs the bot without a Redis) and the store used by unit and
//! integration tests. Loses the pool on restart, which only costs a
//! repopulation on the next dispense.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::PoolStore;
use crate::error::Result;

/// Process-local pool store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PoolStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, blob: Vec<u8>) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), blob);
        Ok(())
    }
}
