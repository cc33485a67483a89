//! Caching module for Agrimarket
//!
//! Rendered sitemap documents are expensive to rebuild on every crawl, so
//! they are kept for a configurable time.

use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Cache for rendered sitemap documents, keyed by base URL
pub struct SitemapCache {
    cache: Cache<String, Arc<String>>,
}

impl SitemapCache {
    /// Create a new sitemap cache with specified TTL
    pub fn new(ttl_seconds: u64, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        Self { cache }
    }

    /// Get the cached document or build it once.
    ///
    /// A failed build is not cached; concurrent callers share its error.
    pub async fn get_or_try_build<F, E>(&self, key: &str, build: F) -> Result<Arc<String>, Arc<E>>
    where
        F: Future<Output = Result<String, E>>,
        E: Send + Sync + 'static,
    {
        self.cache
            .try_get_with(key.to_string(), async move { build.await.map(Arc::new) })
            .await
    }

    /// Get a cached document
    pub async fn get(&self, key: &str) -> Option<Arc<String>> {
        self.cache.get(key).await
    }

    /// Clear the entire cache
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Get cache size.
    ///
    /// Approximate until pending maintenance has run.
    pub fn size(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Apply pending inserts and evictions
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl Default for SitemapCache {
    fn default() -> Self {
        Self::new(3600, 16) // 1 hour TTL
    }
}
