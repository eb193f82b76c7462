//! Configuration Module
//!
//! Handles loading and managing bot configuration from environment variables.
//! Everything is loaded once at startup and passed down explicitly; no
//! module-level globals.

use std::env;

/// Bot configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for posting chat messages
    pub bot_token: String,
    /// Bot user id, used to recognize mentions (`<@BOT_ID>`)
    pub bot_id: String,
    /// Redis connection URL; None means the in-memory store (local mode)
    pub redis_url: Option<String>,
    /// Source categories (subreddits) the pool is filled from
    pub categories: Vec<String>,
    /// Maximum candidates fetched per category
    pub fetch_limit: u32,
    /// Size ceiling in bytes for accepted images
    pub max_image_bytes: usize,
    /// Store key the serialized pool lives under
    pub pool_key: String,
    /// HTTP server port
    pub server_port: u16,
    /// Seconds between forced pool repopulations
    pub refresh_interval: u64,
    /// Timeout in seconds applied to every outbound HTTP call
    pub http_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SLACK_BOT_TOKEN` - Chat API bearer token (default: empty)
    /// - `SLACK_BOT_ID` - Bot user id for mention matching (default: empty)
    /// - `REDIS_URL` - Pool store URL (default: unset, in-memory store)
    /// - `SUBREDDITS` - Comma-separated categories (default: meirl,memes,funny)
    /// - `FETCH_LIMIT` - Candidates per category (default: 50)
    /// - `MAX_IMAGE_BYTES` - Image size ceiling (default: 1000000)
    /// - `POOL_KEY` - Store key for the pool blob (default: cache)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `REFRESH_INTERVAL` - Repopulation interval in seconds (default: 604800)
    /// - `HTTP_TIMEOUT` - Outbound HTTP timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        Self {
            bot_token: env::var("SLACK_BOT_TOKEN").unwrap_or_default(),
            bot_id: env::var("SLACK_BOT_ID").unwrap_or_default(),
            redis_url: env::var("REDIS_URL").ok(),
            categories: env::var("SUBREDDITS")
                .ok()
                .map(|v| parse_categories(&v))
                .filter(|v| !v.is_empty())
                .unwrap_or_else(default_categories),
            fetch_limit: env::var("FETCH_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            max_image_bytes: env::var("MAX_IMAGE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1_000_000),
            pool_key: env::var("POOL_KEY").unwrap_or_else(|_| "cache".to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            refresh_interval: env::var("REFRESH_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(604_800),
            http_timeout: env::var("HTTP_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            bot_id: String::new(),
            redis_url: None,
            categories: default_categories(),
            fetch_limit: 50,
            max_image_bytes: 1_000_000,
            pool_key: "cache".to_string(),
            server_port: 3000,
            refresh_interval: 604_800,
            http_timeout: 10,
        }
    }
}

fn default_categories() -> Vec<String> {
    vec![
        "meirl".to_string(),
        "memes".to_string(),
        "funny".to_string(),
    ]
}

fn parse_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
