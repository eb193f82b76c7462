//! Pool Manager Module
//!
//! Orchestrates population (fetch + validate + persist) and consumption
//! (load + pick + remove + persist) of the meme pool, including the
//! refill-on-empty policy.
//!
//! # Known race
//! The dispense path is a read-modify-write over a shared store key and
//! is not atomic: two dispensers can read the same pool, each remove
//! their own pick, and each write back a collection missing only it.
//! The net effect is a lost update and a possible re-serve. This is an
//! accepted last-writer-wins trade-off; the pool is repopulated wholesale
//! often enough that it never compounds.

use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{PoolError, Result};
use crate::pool::{ItemValidator, MemeItem, Pool, Verdict};
use crate::source::ContentSource;
use crate::store::PoolStore;

// == Pool Manager ==
/// Owns the populate/dispense lifecycle of the stored pool.
pub struct PoolManager {
    source: Arc<dyn ContentSource>,
    validator: ItemValidator,
    store: Arc<dyn PoolStore>,
    categories: Vec<String>,
    fetch_limit: u32,
    pool_key: String,
}

impl PoolManager {
    /// Creates a manager wired to its collaborators, with tunables taken
    /// from the configuration.
    pub fn new(
        source: Arc<dyn ContentSource>,
        validator: ItemValidator,
        store: Arc<dyn PoolStore>,
        config: &Config,
    ) -> Self {
        Self {
            source,
            validator,
            store,
            categories: config.categories.clone(),
            fetch_limit: config.fetch_limit,
            pool_key: config.pool_key.clone(),
        }
    }

    // == Populate ==
    /// Refills the pool from the content source, replacing whatever was
    /// previously stored.
    ///
    /// For each configured category the top candidates are fetched,
    /// shuffled (so repeated populates don't always surface the same top
    /// item first), validated once each, and deduplicated by URL across
    /// the whole pass. A failed category is logged and skipped; the other
    /// categories still contribute.
    ///
    /// Returns `Err(NoValidItems)` when zero candidates survive
    /// validation, and `Err(StoreUnavailable)` when the final write fails.
    pub async fn populate(&self) -> Result<()> {
        info!("caching new memes");

        let mut pool = Pool::new();

        for category in &self.categories {
            let mut candidates = match self.source.list_top(category, self.fetch_limit).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!(category = %category, error = %e, "category fetch failed, skipping");
                    continue;
                }
            };

            // Break the source's popularity ordering. Scoped so the rng
            // is dropped before the probes below are awaited.
            {
                let mut rng = rand::thread_rng();
                candidates.shuffle(&mut rng);
            }

            let mut accepted = 0usize;
            for candidate in candidates {
                if candidate.url.is_empty() || pool.contains_url(&candidate.url) {
                    continue;
                }

                match self.validator.validate(&candidate.url).await {
                    Verdict::Accepted => {
                        pool.push(MemeItem {
                            category: category.clone(),
                            title: candidate.title,
                            url: candidate.url,
                            id: candidate.id,
                        });
                        accepted += 1;
                    }
                    Verdict::Rejected(reason) => {
                        debug!(category = %category, url = %candidate.url, ?reason, "candidate rejected");
                    }
                }
            }

            info!(category = %category, accepted, "category indexed");
        }

        if pool.is_empty() {
            return Err(PoolError::NoValidItems(
                "every category failed or yielded zero accepted candidates".to_string(),
            ));
        }

        let blob = encode(&pool)?;
        self.store.set(&self.pool_key, blob).await?;

        info!(items = pool.len(), "meme pool populated");
        Ok(())
    }

    // == Dispense ==
    /// Removes and returns one uniformly random item from the stored pool.
    ///
    /// An absent, empty, or malformed stored pool triggers exactly one
    /// `populate` before picking. Each successful dispense strictly
    /// shrinks the stored collection by one, so against a single pool
    /// generation no item is returned twice.
    pub async fn dispense(&self) -> Result<MemeItem> {
        let mut pool = self.load().await?;

        if pool.is_empty() {
            self.populate().await?;
            pool = self.load().await?;
        }

        // Scoped so the rng is dropped before the write-back await.
        let item = {
            let mut rng = rand::thread_rng();
            pool.take_random(&mut rng)
        };
        let Some(item) = item else {
            // A concurrent dispenser can race the fill and drain it first.
            return Err(PoolError::EmptyAfterPopulate);
        };

        let blob = encode(&pool)?;
        self.store.set(&self.pool_key, blob).await?;

        info!(id = %item.id, category = %item.category, url = %item.url, "meme dispensed");
        Ok(item)
    }

    // == Remaining ==
    /// Returns the number of items currently stored (absent pool counts
    /// as zero). Feeds the stats endpoint.
    pub async fn remaining(&self) -> Result<usize> {
        Ok(self.load().await?.len())
    }

    /// Loads the stored pool. Absent and malformed blobs both come back
    /// as an empty pool so the caller's refill policy covers them.
    async fn load(&self) -> Result<Pool> {
        match self.store.get(&self.pool_key).await? {
            None => Ok(Pool::new()),
            Some(blob) => match Pool::from_bytes(&blob) {
                Ok(pool) => Ok(pool),
                Err(e) => {
                    warn!(error = %e, "stored pool is malformed, treating as empty");
                    Ok(Pool::new())
                }
            },
        }
    }
}

fn encode(pool: &Pool) -> Result<Vec<u8>> {
    pool.to_bytes()
        .map_err(|e| PoolError::StoreUnavailable(format!("pool serialization failed: {}", e)))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::pool::UrlProbe;
    use crate::source::Candidate;
    use crate::store::MemoryStore;

    /// Canned per-category listings with a fetch counter.
    struct FakeSource {
        by_category: HashMap<String, Vec<Candidate>>,
        failing: HashSet<String>,
        fetches: AtomicUsize,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                by_category: HashMap::new(),
                failing: HashSet::new(),
                fetches: AtomicUsize::new(0),
            }
        }

        fn with(mut self, category: &str, candidates: Vec<Candidate>) -> Self {
            self.by_category.insert(category.to_string(), candidates);
            self
        }

        fn failing(mut self, category: &str) -> Self {
            self.failing.insert(category.to_string());
            self
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentSource for FakeSource {
        async fn list_top(&self, category: &str, _limit: u32) -> anyhow::Result<Vec<Candidate>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(category) {
                anyhow::bail!("category unreachable: {}", category);
            }
            Ok(self.by_category.get(category).cloned().unwrap_or_default())
        }
    }

    /// Probe that classifies by URL extension: .png is a small image,
    /// anything else is an HTML page.
    struct ExtensionProbe;

    #[async_trait]
    impl UrlProbe for ExtensionProbe {
        async fn content_type(&self, url: &str) -> anyhow::Result<String> {
            if url.ends_with(".png") {
                Ok("image/png".to_string())
            } else {
                Ok("text/html".to_string())
            }
        }

        async fn content_length(&self, _url: &str) -> anyhow::Result<usize> {
            Ok(1_000)
        }
    }

    /// Store whose get/set can be switched to fail mid-test, over a
    /// working inner store.
    struct FlakyStore {
        inner: MemoryStore,
        fail_get: AtomicBool,
        fail_set: AtomicBool,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                fail_get: AtomicBool::new(false),
                fail_set: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl PoolStore for FlakyStore {
        async fn get(&self, key: &str) -> crate::error::Result<Option<Vec<u8>>> {
            if self.fail_get.load(Ordering::SeqCst) {
                return Err(PoolError::StoreUnavailable("connection reset".to_string()));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, blob: Vec<u8>) -> crate::error::Result<()> {
            if self.fail_set.load(Ordering::SeqCst) {
                return Err(PoolError::StoreUnavailable("connection reset".to_string()));
            }
            self.inner.set(key, blob).await
        }
    }

    /// Store that always reads back an empty pool, as if a concurrent
    /// dispenser drained every fill the moment it landed.
    struct DrainedStore;

    #[async_trait]
    impl PoolStore for DrainedStore {
        async fn get(&self, _key: &str) -> crate::error::Result<Option<Vec<u8>>> {
            Ok(Some(b"[]".to_vec()))
        }

        async fn set(&self, _key: &str, _blob: Vec<u8>) -> crate::error::Result<()> {
            Ok(())
        }
    }

    fn candidate(category: &str, n: u32) -> Candidate {
        Candidate {
            id: format!("{}{}", category, n),
            title: format!("{} meme {}", category, n),
            url: format!("https://i.example/{}/{}.png", category, n),
        }
    }

    fn test_config() -> Config {
        Config {
            categories: vec!["meirl".into(), "memes".into(), "funny".into()],
            ..Config::default()
        }
    }

    fn manager(source: FakeSource, store: Arc<MemoryStore>) -> (PoolManager, Arc<FakeSource>) {
        let source = Arc::new(source);
        let validator = ItemValidator::new(Arc::new(ExtensionProbe), 1_000_000);
        let manager = PoolManager::new(source.clone(), validator, store, &test_config());
        (manager, source)
    }

    fn two_per_category() -> FakeSource {
        FakeSource::new()
            .with("meirl", vec![candidate("meirl", 1), candidate("meirl", 2)])
            .with("memes", vec![candidate("memes", 1), candidate("memes", 2)])
            .with("funny", vec![candidate("funny", 1), candidate("funny", 2)])
    }

    async fn stored_pool(store: &MemoryStore) -> Pool {
        let blob = store.get("cache").await.unwrap().unwrap();
        Pool::from_bytes(&blob).unwrap()
    }

    #[tokio::test]
    async fn test_populate_stores_all_valid_candidates() {
        let store = Arc::new(MemoryStore::new());
        let (manager, _) = manager(two_per_category(), store.clone());

        manager.populate().await.unwrap();

        assert_eq!(stored_pool(&store).await.len(), 6);
    }

    #[tokio::test]
    async fn test_populate_filters_non_images() {
        let source = FakeSource::new().with(
            "memes",
            vec![
                candidate("memes", 1),
                Candidate {
                    id: "page1".into(),
                    title: "not an image".into(),
                    url: "https://example.com/article".into(),
                },
            ],
        );
        let store = Arc::new(MemoryStore::new());
        let (manager, _) = manager(source, store.clone());

        manager.populate().await.unwrap();

        let pool = stored_pool(&store).await;
        assert_eq!(pool.len(), 1);
        assert!(pool.contains_url("https://i.example/memes/1.png"));
    }

    #[tokio::test]
    async fn test_populate_survives_failing_categories() {
        let source = FakeSource::new()
            .failing("meirl")
            .failing("memes")
            .with("funny", vec![candidate("funny", 1)]);
        let store = Arc::new(MemoryStore::new());
        let (manager, _) = manager(source, store.clone());

        manager.populate().await.unwrap();

        assert_eq!(stored_pool(&store).await.len(), 1);
    }

    #[tokio::test]
    async fn test_populate_all_categories_failing() {
        let source = FakeSource::new()
            .failing("meirl")
            .failing("memes")
            .failing("funny");
        let (manager, _) = manager(source, Arc::new(MemoryStore::new()));

        let result = manager.populate().await;
        assert!(matches!(result, Err(PoolError::NoValidItems(_))));
    }

    #[tokio::test]
    async fn test_populate_dedups_repeated_urls() {
        let shared = Candidate {
            id: "x1".into(),
            title: "crosspost".into(),
            url: "https://i.example/shared.png".into(),
        };
        let source = FakeSource::new()
            .with("meirl", vec![shared.clone()])
            .with("memes", vec![shared.clone()])
            .with("funny", vec![shared]);
        let store = Arc::new(MemoryStore::new());
        let (manager, _) = manager(source, store.clone());

        manager.populate().await.unwrap();

        assert_eq!(stored_pool(&store).await.len(), 1);
    }

    #[tokio::test]
    async fn test_populate_replaces_previous_pool() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("cache", Pool::from_items(vec![]).to_bytes().unwrap())
            .await
            .unwrap();
        let (manager, _) = manager(two_per_category(), store.clone());

        manager.populate().await.unwrap();
        manager.populate().await.unwrap();

        // No merge: two passes over the same source still store 6 items.
        assert_eq!(stored_pool(&store).await.len(), 6);
    }

    #[tokio::test]
    async fn test_dispense_shrinks_store_by_one() {
        let store = Arc::new(MemoryStore::new());
        let (manager, _) = manager(two_per_category(), store.clone());

        manager.populate().await.unwrap();
        let item = manager.dispense().await.unwrap();

        let pool = stored_pool(&store).await;
        assert_eq!(pool.len(), 5);
        assert!(!pool.contains_url(&item.url));
    }

    #[tokio::test]
    async fn test_dispense_empty_store_populates_once() {
        let store = Arc::new(MemoryStore::new());
        let (manager, source) = manager(two_per_category(), store.clone());

        let item = manager.dispense().await.unwrap();

        // Exactly one populate pass: one fetch per configured category.
        assert_eq!(source.fetches(), 3);
        assert!(!item.url.is_empty());
    }

    #[tokio::test]
    async fn test_dispense_never_repeats_within_generation() {
        let store = Arc::new(MemoryStore::new());
        let (manager, source) = manager(two_per_category(), store.clone());

        manager.populate().await.unwrap();
        let first_pass_fetches = source.fetches();

        let mut seen = HashSet::new();
        for _ in 0..6 {
            let item = manager.dispense().await.unwrap();
            assert!(seen.insert(item.url), "item re-served within one generation");
        }
        assert_eq!(source.fetches(), first_pass_fetches);
        assert_eq!(stored_pool(&store).await.len(), 0);

        // Seventh call finds the pool drained and re-populates.
        manager.dispense().await.unwrap();
        assert_eq!(source.fetches(), first_pass_fetches + 3);
    }

    #[tokio::test]
    async fn test_dispense_no_valid_items_propagates() {
        let source = FakeSource::new()
            .failing("meirl")
            .failing("memes")
            .failing("funny");
        let (manager, _) = manager(source, Arc::new(MemoryStore::new()));

        let result = manager.dispense().await;
        assert!(matches!(result, Err(PoolError::NoValidItems(_))));
    }

    #[tokio::test]
    async fn test_dispense_recovers_from_malformed_blob() {
        let store = Arc::new(MemoryStore::new());
        store.set("cache", b"not json at all".to_vec()).await.unwrap();
        let (manager, source) = manager(two_per_category(), store.clone());

        let item = manager.dispense().await.unwrap();

        assert_eq!(source.fetches(), 3);
        assert!(item.url.ends_with(".png"));
        assert_eq!(stored_pool(&store).await.len(), 5);
    }

    #[tokio::test]
    async fn test_remaining_reports_stored_size() {
        let store = Arc::new(MemoryStore::new());
        let (manager, _) = manager(two_per_category(), store.clone());

        assert_eq!(manager.remaining().await.unwrap(), 0);
        manager.populate().await.unwrap();
        assert_eq!(manager.remaining().await.unwrap(), 6);
    }

    fn flaky_manager(store: Arc<FlakyStore>) -> PoolManager {
        let validator = ItemValidator::new(Arc::new(ExtensionProbe), 1_000_000);
        PoolManager::new(Arc::new(two_per_category()), validator, store, &test_config())
    }

    #[tokio::test]
    async fn test_populate_write_failure_is_store_unavailable() {
        let store = Arc::new(FlakyStore::new());
        let old_pool = Pool::from_items(vec![MemeItem {
            category: "memes".to_string(),
            title: "old meme".to_string(),
            url: "https://i.example/old.png".to_string(),
            id: "old1".to_string(),
        }]);
        store
            .inner
            .set("cache", old_pool.to_bytes().unwrap())
            .await
            .unwrap();
        store.fail_set.store(true, Ordering::SeqCst);
        let manager = flaky_manager(store.clone());

        let result = manager.populate().await;
        assert!(matches!(result, Err(PoolError::StoreUnavailable(_))));

        // The failed write must not have mutated the stored pool.
        assert_eq!(stored_pool(&store.inner).await, old_pool);
    }

    #[tokio::test]
    async fn test_dispense_read_failure_is_store_unavailable() {
        let store = Arc::new(FlakyStore::new());
        store.fail_get.store(true, Ordering::SeqCst);
        let manager = flaky_manager(store);

        let result = manager.dispense().await;
        assert!(matches!(result, Err(PoolError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_dispense_write_failure_is_store_unavailable() {
        let store = Arc::new(FlakyStore::new());
        let manager = flaky_manager(store.clone());

        manager.populate().await.unwrap();
        store.fail_set.store(true, Ordering::SeqCst);

        let result = manager.dispense().await;
        assert!(matches!(result, Err(PoolError::StoreUnavailable(_))));

        // The failed write-back must leave the stored pool intact.
        assert_eq!(stored_pool(&store.inner).await.len(), 6);
    }

    #[tokio::test]
    async fn test_dispense_empty_after_populate() {
        let source = Arc::new(two_per_category());
        let validator = ItemValidator::new(Arc::new(ExtensionProbe), 1_000_000);
        let manager = PoolManager::new(
            source.clone(),
            validator,
            Arc::new(DrainedStore),
            &test_config(),
        );

        let result = manager.dispense().await;
        assert!(matches!(result, Err(PoolError::EmptyAfterPopulate)));

        // The refill did run; the re-read just found it drained again.
        assert_eq!(source.fetches(), 3);
    }
}
