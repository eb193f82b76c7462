//! Background Tasks Module
//!
//! Contains background tasks that run periodically during bot operation.
//!
//! # Tasks
//! - Pool Refresh: repopulates the meme pool at configured intervals so
//!   stale items rotate out even when the pool is never drained

mod refresh;

pub use refresh::spawn_refresh_task;
