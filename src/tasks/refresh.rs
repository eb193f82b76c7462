//! Pool Refresh Task
//!
//! Background task that periodically repopulates the meme pool, replacing
//! whatever is stored. Keeps content fresh on quiet workspaces where the
//! drain-triggered refill rarely fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::pool::PoolManager;

/// Spawns a background task that repopulates the pool on a fixed interval.
///
/// A failed refresh is logged and retried at the next tick; the stored
/// pool is left untouched on failure, so dispensing continues from the
/// previous generation.
///
/// # Arguments
/// * `manager` - Shared pool manager
/// * `refresh_interval_secs` - Interval in seconds between refreshes
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_refresh_task(manager: Arc<PoolManager>, refresh_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(refresh_interval_secs);

    tokio::spawn(async move {
        info!(
            "starting pool refresh task with interval of {} seconds",
            refresh_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            match manager.populate().await {
                Ok(()) => info!("scheduled pool refresh complete"),
                Err(e) => warn!(error = %e, "scheduled pool refresh failed, will retry next tick"),
            }
        }
    })
}
