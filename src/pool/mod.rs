//! Pool Module
//!
//! The meme pool cache: validated items persisted as one blob in the pool
//! store, dispensed one at a time without repetition, repopulated from
//! the content source when drained.

mod item;
mod manager;
mod validator;


// Re-export public types
pub use item::{MemeItem, Pool};
pub use manager::PoolManager;
pub use validator::{HttpProbe, ItemValidator, RejectReason, UrlProbe, Verdict};
