//! Content Source Module
//!
//! Adapter boundary for the external content source the pool is filled
//! from. Best-effort: a category may error or come back short, and that
//! must never abort population of the other categories.

mod reddit;

pub use reddit::RedditSource;

use async_trait::async_trait;

// == Candidate ==
/// An item returned by the content source before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Stable identifier from the source
    pub id: String,
    /// Human-readable caption
    pub title: String,
    /// Link to the content, not yet known to be an image
    pub url: String,
}

// == Content Source ==
/// Ordered, best-effort listing of top candidates per category.
///
/// The source's own ranking is intentionally re-shuffled downstream, so
/// implementations only need to return whatever "top" means to them.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Returns up to `limit` top candidates for the category.
    async fn list_top(&self, category: &str, limit: u32) -> anyhow::Result<Vec<Candidate>>;
}
