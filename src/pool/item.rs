//! Meme Item Module
//!
//! Defines the data model for validated pool entries and the serialized
//! pool blob stored under a single key in the pool store.

use rand::Rng;
use serde::{Deserialize, Serialize};

// == Meme Item ==
/// One validated candidate: title and image URL plus traceability fields.
///
/// Every `MemeItem` that reaches the store has already passed validation
/// (image content-type, size within the ceiling).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemeItem {
    /// Source category the item was drawn from
    pub category: String,
    /// Human-readable caption
    pub title: String,
    /// Direct link to image content
    pub url: String,
    /// Stable identifier from the content source, for logging only
    pub id: String,
}

// == Pool ==
/// The persisted collection of dispensable items.
///
/// Serialized as a single JSON blob; order is not significant. Reaching
/// size zero is a valid state that triggers repopulation on next access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pool {
    items: Vec<MemeItem>,
}

impl Pool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates a pool from an existing list of validated items.
    pub fn from_items(items: Vec<MemeItem>) -> Self {
        Self { items }
    }

    /// Returns the current number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the pool holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a validated item.
    pub fn push(&mut self, item: MemeItem) {
        self.items.push(item);
    }

    /// Returns true if any item in the pool carries the given URL.
    pub fn contains_url(&self, url: &str) -> bool {
        self.items.iter().any(|item| item.url == url)
    }

    /// Removes and returns one uniformly random item, or None if empty.
    ///
    /// The removed element is the exact element that was picked; callers
    /// that persist the reduced pool get a collection missing only it.
    pub fn take_random<R: Rng>(&mut self, rng: &mut R) -> Option<MemeItem> {
        if self.items.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.items.len());
        Some(self.items.swap_remove(idx))
    }

    /// Serializes the pool to the stored blob format.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.items)
    }

    /// Deserializes a pool from a stored blob.
    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        let items = serde_json::from_slice(bytes)?;
        Ok(Self { items })
    }

    /// Iterates over the items without consuming the pool.
    pub fn iter(&self) -> impl Iterator<Item = &MemeItem> {
        self.items.iter()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn item(n: u32) -> MemeItem {
        MemeItem {
            category: "memes".to_string(),
            title: format!("title {}", n),
            url: format!("https://i.example/{}.png", n),
            id: format!("id{}", n),
        }
    }

    #[test]
    fn test_pool_roundtrip_preserves_content() {
        let pool = Pool::from_items(vec![item(1), item(2), item(3)]);

        let bytes = pool.to_bytes().unwrap();
        let decoded = Pool::from_bytes(&bytes).unwrap();

        let before: HashSet<_> = pool.iter().map(|i| i.url.clone()).collect();
        let after: HashSet<_> = decoded.iter().map(|i| i.url.clone()).collect();
        assert_eq!(before, after);
        assert_eq!(decoded.len(), 3);
    }

    #[test]
    fn test_pool_from_bytes_malformed() {
        assert!(Pool::from_bytes(b"not json").is_err());
        assert!(Pool::from_bytes(b"{\"oops\":1}").is_err());
    }

    #[test]
    fn test_pool_from_bytes_empty_list() {
        let pool = Pool::from_bytes(b"[]").unwrap();
        assert!(pool.is_empty());
    }

    #[test]
    fn test_take_random_shrinks_by_one() {
        let mut pool = Pool::from_items(vec![item(1), item(2), item(3)]);
        let mut rng = rand::thread_rng();

        let taken = pool.take_random(&mut rng).unwrap();
        assert_eq!(pool.len(), 2);
        assert!(!pool.contains_url(&taken.url));
    }

    #[test]
    fn test_take_random_empty() {
        let mut pool = Pool::new();
        let mut rng = rand::thread_rng();
        assert!(pool.take_random(&mut rng).is_none());
    }

    #[test]
    fn test_contains_url() {
        let pool = Pool::from_items(vec![item(7)]);
        assert!(pool.contains_url("https://i.example/7.png"));
        assert!(!pool.contains_url("https://i.example/8.png"));
    }
}
