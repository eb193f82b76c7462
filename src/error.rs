//! Error types for the meme pool
//!
//! Provides unified error handling using thiserror.
//!
//! All pool errors collapse to the same chat-facing outcome (a filler
//! reply); the distinctions below exist for logging and for the HTTP
//! surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Pool Error Enum ==
/// Unified error type for pool population and dispensing.
#[derive(Error, Debug)]
pub enum PoolError {
    /// Population finished with zero accepted candidates
    #[error("No valid items: {0}")]
    NoValidItems(String),

    /// The pool store get/set failed; the caller must not assume any
    /// mutation occurred
    #[error("Pool store unavailable: {0}")]
    StoreUnavailable(String),

    /// A populate succeeded but the dispenser still found nothing to serve
    /// (e.g., a concurrent dispenser raced the fill)
    #[error("Pool empty after populate")]
    EmptyAfterPopulate,
}

// == IntoResponse Implementation ==
impl IntoResponse for PoolError {
    fn into_response(self) -> Response {
        let status = match &self {
            PoolError::NoValidItems(_) => StatusCode::BAD_GATEWAY,
            PoolError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            PoolError::EmptyAfterPopulate => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
