//! Pool Store Module
//!
//! Key-value boundary the serialized pool lives behind: `get` and `set`
//! of a single blob under a fixed key. No transactions - the read-modify-
//! write the pool manager performs over this interface is last-writer-wins
//! by design (see the manager docs).

mod memory;
mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

use async_trait::async_trait;

use crate::error::Result;

// == Pool Store ==
/// Shared, process-external blob store.
///
/// Failures surface as `PoolError::StoreUnavailable`; callers must not
/// assume any mutation occurred on error.
#[async_trait]
pub trait PoolStore: Send + Sync {
    /// Returns the blob stored under `key`, or None if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `blob` under `key`, replacing any previous value.
    async fn set(&self, key: &str, blob: Vec<u8>) -> Result<()>;
}
