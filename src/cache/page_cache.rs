// Page cache for the photo feed.
// Serves (category, page) from the store, fetching and persisting on a miss,
// and tracks each category's total-page estimate.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::model::{Category, Item, PageEntry};

use super::fetcher::PageFetcher;
use super::paths::CacheKey;
use super::store::KvStore;

/// Placeholder total used until the remote reports one.
pub const DEFAULT_TOTAL_PAGES: u32 = 100;

/// Total-page estimate for one category.
///
/// The first report from the remote replaces the placeholder; later reports only
/// raise it, so the result does not depend on the order fetches complete in. The
/// estimate never drops below the highest page this process has served.
#[derive(Debug, Default)]
struct PageEstimate {
    /// Largest total reported by the remote, 0 until the first report.
    reported: AtomicU32,
    /// Highest page fetched or served from the store.
    highest_seen: AtomicU32,
}

impl PageEstimate {
    fn record_page(&self, page: u32) {
        self.highest_seen.fetch_max(page, Ordering::AcqRel);
    }

    fn merge(&self, page: u32, reported_total: u32) {
        self.reported
            .fetch_max(reported_total.max(1), Ordering::AcqRel);
        self.record_page(page);
    }

    fn value(&self, placeholder: u32) -> u32 {
        let reported = match self.reported.load(Ordering::Acquire) {
            0 => placeholder,
            total => total,
        };
        reported
            .max(self.highest_seen.load(Ordering::Acquire))
            .max(1)
    }
}

/// Cache of feed pages backed by a durable store and a remote fetcher.
///
/// A stored page is always served as-is; only [`PageCache::refresh`] replaces it.
/// Failed fetches never write anything, so a later `get` retries.
pub struct PageCache {
    store: Arc<dyn KvStore>,
    fetcher: Arc<dyn PageFetcher>,
    initial_total_pages: u32,
    estimates: RwLock<HashMap<Category, Arc<PageEstimate>>>,
}

impl PageCache {
    pub fn new(store: Arc<dyn KvStore>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_initial_total(store, fetcher, DEFAULT_TOTAL_PAGES)
    }

    /// Create a cache whose estimates start at `initial_total_pages`.
    pub fn with_initial_total(
        store: Arc<dyn KvStore>,
        fetcher: Arc<dyn PageFetcher>,
        initial_total_pages: u32,
    ) -> Self {
        Self {
            store,
            fetcher,
            initial_total_pages: initial_total_pages.max(1),
            estimates: RwLock::new(HashMap::new()),
        }
    }

    /// Get the items of a page, fetching them only if the page was never stored.
    pub async fn get(&self, category: &Category, page: u32) -> Result<Vec<Item>> {
        let key = CacheKey::new(category.clone(), page)?.to_string();

        if let Some(entry) = self.read_entry(&key)? {
            debug!(%category, page, items = entry.items.len(), "Cache hit");
            self.estimate(category).record_page(page);
            return Ok(entry.items);
        }

        debug!(%category, page, "Cache miss");
        self.fetch_and_store(category, page, &key).await
    }

    /// Fetch a page even if it is stored, replacing the entry on success.
    /// On failure the previous entry, if any, is left untouched.
    pub async fn refresh(&self, category: &Category, page: u32) -> Result<Vec<Item>> {
        let key = CacheKey::new(category.clone(), page)?.to_string();
        debug!(%category, page, "Refreshing page");
        self.fetch_and_store(category, page, &key).await
    }

    /// The stored entry for a page, with its fetch time. Never fetches.
    pub fn entry(&self, category: &Category, page: u32) -> Result<Option<PageEntry>> {
        let key = CacheKey::new(category.clone(), page)?.to_string();
        self.read_entry(&key)
    }

    /// Check if a page is stored.
    pub fn is_cached(&self, category: &Category, page: u32) -> Result<bool> {
        let key = CacheKey::new(category.clone(), page)?.to_string();
        self.store.contains(&key)
    }

    /// Current total-page estimate for a category.
    pub fn total_pages(&self, category: &Category) -> u32 {
        let estimates = self.estimates.read();
        estimates
            .get(category)
            .map_or(self.initial_total_pages, |estimate| {
                estimate.value(self.initial_total_pages)
            })
    }

    fn estimate(&self, category: &Category) -> Arc<PageEstimate> {
        if let Some(estimate) = self.estimates.read().get(category) {
            return Arc::clone(estimate);
        }
        Arc::clone(
            self.estimates
                .write()
                .entry(category.clone())
                .or_default(),
        )
    }

    fn read_entry(&self, key: &str) -> Result<Option<PageEntry>> {
        let Some(bytes) = self.store.get(key)? else {
            return Ok(None);
        };
        let fetched_at = self.store.modified_at(key)?.unwrap_or_else(Utc::now);
        PageEntry::from_bytes(key, &bytes, fetched_at).map(Some)
    }

    async fn fetch_and_store(
        &self,
        category: &Category,
        page: u32,
        key: &str,
    ) -> Result<Vec<Item>> {
        let fetched = match self.fetcher.fetch(category, page).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(%category, page, error = %e, "Fetch failed, nothing cached");
                return Err(e.into());
            }
        };

        self.estimate(category).merge(page, fetched.total_pages);

        let entry = PageEntry::new(fetched.items);
        self.store.put(key, &entry.to_bytes()?)?;
        trace!(
            key,
            items = entry.items.len(),
            total_pages = fetched.total_pages,
            "Stored fetched page"
        );

        Ok(entry.items)
    }
}
