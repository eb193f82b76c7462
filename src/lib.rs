//! Memebot - a chat-triggered meme dispenser
//!
//! Caches validated memes from trending categories in a shared pool
//! store and serves one previously-unseen item per request, refilling
//! the pool when it drains.

pub mod api;
pub mod bot;
pub mod config;
pub mod error;
pub mod models;
pub mod pool;
pub mod source;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_refresh_task;
