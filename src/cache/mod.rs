// Cache module for the photo feed.
// Stores fetched pages locally so revisiting a page never hits the network.

pub mod fetcher;
pub mod page_cache;
pub mod paths;
pub mod store;

pub use fetcher::{FetchError, FetchedPage, PageFetcher, RetryPolicy, RetryingFetcher};
pub use page_cache::{DEFAULT_TOTAL_PAGES, PageCache};
pub use paths::{CacheKey, cache_dir, pages_dir};
pub use store::{FileStore, KvStore, MemoryStore};
