// Category session state.
// Tracks the active category and page and routes reads through the page cache.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::PageCache;
use crate::error::{FramesError, Result};
use crate::model::{Category, Item};

use super::pagination::{self, DEFAULT_RADIUS, PageWindow};

/// Browsing state for one feed view.
///
/// Mutated by a single owner; the page cache behind it may be shared.
pub struct CategorySession {
    cache: Arc<PageCache>,
    active_category: Category,
    current_page: u32,
    radius: u32,
}

impl CategorySession {
    /// Start on page 1 of `category`.
    pub fn new(cache: Arc<PageCache>, category: Category) -> Self {
        Self {
            cache,
            active_category: category,
            current_page: 1,
            radius: DEFAULT_RADIUS,
        }
    }

    /// Set how many pages the window shows on each side of the current page.
    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    pub fn active_category(&self) -> &Category {
        &self.active_category
    }

    /// Current page, clamped to the estimate. The estimate of a shared cache
    /// can shrink under the session when the remote's first count arrives.
    pub fn current_page(&self) -> u32 {
        self.current_page.min(self.total_pages())
    }

    /// Total-page estimate for the active category.
    pub fn total_pages(&self) -> u32 {
        self.cache.total_pages(&self.active_category)
    }

    /// Switch category. Resets to page 1 unless the category is unchanged.
    pub fn set_category(&mut self, category: Category) {
        if category == self.active_category {
            return;
        }
        debug!(from = %self.active_category, to = %category, "Switching category");
        self.active_category = category;
        self.current_page = 1;
    }

    /// Move to `page`. Rejected, with state unchanged, if outside the estimate.
    pub fn set_page(&mut self, page: u32) -> Result<()> {
        let total = self.total_pages();
        if page == 0 || page > total {
            return Err(FramesError::OutOfRange { page, total });
        }
        self.current_page = page;
        Ok(())
    }

    pub fn next_page(&mut self) -> Result<()> {
        self.set_page(self.current_page().saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Result<()> {
        self.set_page(self.current_page().saturating_sub(1))
    }

    /// Items of the current page.
    pub async fn current_items(&self) -> Result<Vec<Item>> {
        self.cache
            .get(&self.active_category, self.current_page())
            .await
    }

    /// Refetch the current page, replacing what is stored.
    pub async fn refresh(&self) -> Result<Vec<Item>> {
        self.cache
            .refresh(&self.active_category, self.current_page())
            .await
    }

    /// Page selector model for the current state.
    pub fn window(&self) -> PageWindow {
        pagination::window(self.current_page(), self.total_pages(), self.radius)
    }

    /// Warm the cache with the next page in the background.
    /// Returns `None` when there is no next page.
    pub fn prefetch_next(&self) -> Option<JoinHandle<()>> {
        let next = self.current_page().checked_add(1)?;
        if next > self.total_pages() {
            return None;
        }

        let cache = Arc::clone(&self.cache);
        let category = self.active_category.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = cache.get(&category, next).await {
                warn!(%category, page = next, error = %e, "Prefetch failed");
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::fetcher::FetchedPage;
    use crate::cache::fetcher::mock::MockFetcher;
    use crate::cache::{DEFAULT_TOTAL_PAGES, MemoryStore};

    fn animals() -> Category {
        Category::new("Animals").unwrap()
    }

    fn session(total_pages: u32) -> (CategorySession, Arc<PageCache>, Arc<MockFetcher>) {
        let fetcher = Arc::new(MockFetcher::new(total_pages));
        let cache = Arc::new(PageCache::new(
            Arc::new(MemoryStore::new()),
            fetcher.clone(),
        ));
        let session = CategorySession::new(Arc::clone(&cache), Category::all());
        (session, cache, fetcher)
    }

    #[test]
    fn test_starts_on_first_page() {
        let (session, _cache, _fetcher) = session(10);
        assert!(session.active_category().is_all());
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.total_pages(), DEFAULT_TOTAL_PAGES);
    }

    #[test]
    fn test_set_category_resets_page() {
        let (mut session, _cache, _fetcher) = session(10);
        session.set_page(5).unwrap();

        session.set_category(animals());
        assert_eq!(session.active_category(), &animals());
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn test_set_same_category_is_noop() {
        let (mut session, _cache, _fetcher) = session(10);
        session.set_category(animals());
        session.set_page(4).unwrap();

        session.set_category(animals());
        assert_eq!(session.current_page(), 4);
    }

    #[test]
    fn test_set_page_out_of_range() {
        let (mut session, _cache, _fetcher) = session(10);
        session.set_page(3).unwrap();
        let total = session.total_pages();

        let err = session.set_page(0).unwrap_err();
        assert!(matches!(err, FramesError::OutOfRange { page: 0, .. }));
        assert_eq!(session.current_page(), 3);

        let err = session.set_page(total + 1).unwrap_err();
        assert!(matches!(err, FramesError::OutOfRange { page, .. } if page == total + 1));
        assert_eq!(session.current_page(), 3);
        assert!(session.active_category().is_all());
    }

    #[tokio::test]
    async fn test_bounds_follow_remote_estimate() {
        let (mut session, _cache, fetcher) = session(4);
        session.current_items().await.unwrap();
        assert_eq!(session.total_pages(), 4);

        assert!(session.set_page(5).is_err());
        session.set_page(4).unwrap();
        assert!(session.next_page().is_err());
        assert_eq!(session.current_page(), 4);
        assert_eq!(fetcher.calls(), 1);
    }

    #[test]
    fn test_prev_page_stops_at_one() {
        let (mut session, _cache, _fetcher) = session(10);
        assert!(session.prev_page().is_err());
        assert_eq!(session.current_page(), 1);

        session.next_page().unwrap();
        session.prev_page().unwrap();
        assert_eq!(session.current_page(), 1);
    }

    #[tokio::test]
    async fn test_current_items_uses_cache() {
        let (mut session, _cache, fetcher) = session(10);
        session.set_category(animals());
        session.set_page(2).unwrap();

        let first = session.current_items().await.unwrap();
        let second = session.current_items().await.unwrap();

        assert_eq!(first, MockFetcher::page_items(&animals(), 2));
        assert_eq!(first, second);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_refetches_current_page() {
        let (session, _cache, fetcher) = session(10);
        session.current_items().await.unwrap();

        let fresh = vec![Item::new("fresh", "https://img.test/fresh.jpg")];
        fetcher.push(Ok(FetchedPage {
            items: fresh.clone(),
            total_pages: 10,
        }));
        assert_eq!(session.refresh().await.unwrap(), fresh);
        assert_eq!(session.current_items().await.unwrap(), fresh);
    }

    #[tokio::test]
    async fn test_window_uses_estimate() {
        let (mut session, _cache, _fetcher) = session(3);
        session.current_items().await.unwrap();
        session.set_page(3).unwrap();

        let w = session.window();
        assert_eq!(w.pages, vec![2, 3]);
        assert!(w.has_prev);
        assert!(!w.has_next);
    }

    #[test]
    fn test_window_radius() {
        let (session, _cache, _fetcher) = session(10);
        let mut session = session.with_radius(2);
        session.set_page(5).unwrap();
        assert_eq!(session.window().pages, vec![3, 4, 5, 6, 7]);
    }

    #[tokio::test]
    async fn test_prefetch_next_warms_cache() {
        let (mut session, cache, fetcher) = session(10);

        session.prefetch_next().unwrap().await.unwrap();
        assert!(cache.is_cached(&Category::all(), 2).unwrap());

        session.next_page().unwrap();
        session.current_items().await.unwrap();
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_prefetch_next_at_last_page() {
        let (mut session, _cache, fetcher) = session(1);
        session.current_items().await.unwrap();
        assert_eq!(session.total_pages(), 1);

        assert!(session.prefetch_next().is_none());
        assert!(session.next_page().is_err());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_page_clamped_when_shared_estimate_shrinks() {
        let (mut session, cache, fetcher) = session(7);
        session.set_page(50).unwrap();

        let other = CategorySession::new(Arc::clone(&cache), Category::all());
        other.current_items().await.unwrap();
        assert_eq!(session.total_pages(), 7);

        assert_eq!(session.current_page(), 7);
        let w = session.window();
        assert_eq!(w.current, 7);
        assert_eq!(w.pages, vec![6, 7]);
        assert_eq!(
            session.current_items().await.unwrap(),
            MockFetcher::page_items(&Category::all(), 7)
        );
        assert_eq!(fetcher.calls(), 2);

        session.prev_page().unwrap();
        assert_eq!(session.current_page(), 6);
    }
}
