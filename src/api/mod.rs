//! API Module
//!
//! HTTP handlers and routing for the bot's webhook and operational
//! endpoints.
//!
//! # Endpoints
//! - `POST /slack/events` - Chat event webhook (challenge + messages)
//! - `GET /stats` - Remaining pool size
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
