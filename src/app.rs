// App state and command dispatch.
// Wires configuration, the page store and the remote fetcher, then runs one command.

use std::io::Write;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{FileStore, KvStore, MemoryStore, PageCache, RetryingFetcher, pages_dir};
use crate::config::{AppConfig, Command};
use crate::error::{FramesError, Result};
use crate::flickr::FlickrClient;
use crate::model::{Category, Item};
use crate::state::{CategorySession, window};

/// Main application state.
pub struct App {
    config: AppConfig,
    /// Built on first use so offline commands never need an API key.
    cache: Option<Arc<PageCache>>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            cache: None,
        }
    }

    /// Create an app around an existing cache.
    pub fn with_cache(config: AppConfig, cache: Arc<PageCache>) -> Self {
        Self {
            config,
            cache: Some(cache),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run one command, writing its output to `out`.
    pub async fn run(&mut self, command: Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Page {
                category,
                page,
                prefetch,
            } => {
                let mut session = self.session(&category)?;
                session.set_page(page)?;
                let items = session.current_items().await?;
                write_page(out, &session, &items)?;

                if prefetch && let Some(handle) = session.prefetch_next() {
                    handle
                        .await
                        .map_err(|e| FramesError::Other(format!("Prefetch task failed: {}", e)))?;
                }
            }
            Command::Refresh { category, page } => {
                let mut session = self.session(&category)?;
                session.set_page(page)?;
                let items = session.refresh().await?;
                info!(category = %session.active_category(), page, "Page refreshed");
                write_page(out, &session, &items)?;
            }
            Command::Window { current, total } => {
                let w = window(current, total, self.config.window_radius);
                writeln!(out, "{}", w.label())?;
            }
            Command::Categories => {
                for category in &self.config.categories {
                    writeln!(out, "{}", category)?;
                }
            }
        }
        Ok(())
    }

    fn session(&mut self, category: &str) -> Result<CategorySession> {
        let category = Category::new(category)?;
        let cache = self.cache()?;
        Ok(CategorySession::new(cache, category).with_radius(self.config.window_radius))
    }

    fn cache(&mut self) -> Result<Arc<PageCache>> {
        if let Some(cache) = &self.cache {
            return Ok(Arc::clone(cache));
        }

        let store: Arc<dyn KvStore> = if self.config.ephemeral {
            debug!("Using in-memory page store");
            Arc::new(MemoryStore::new())
        } else {
            let dir = self
                .config
                .effective_cache_dir()
                .ok_or_else(|| FramesError::Config("No cache directory available".to_string()))?;
            let dir = pages_dir(&dir);
            debug!(dir = %dir.display(), "Using file page store");
            Arc::new(FileStore::open(dir)?)
        };

        let client = FlickrClient::new(
            self.config.require_api_key()?,
            self.config.per_page,
            self.config.request_timeout(),
            self.config.categories.clone(),
        )?;
        let fetcher = RetryingFetcher::new(client, self.config.retry.policy());

        let cache = Arc::new(PageCache::with_initial_total(
            store,
            Arc::new(fetcher),
            self.config.initial_total_pages,
        ));
        self.cache = Some(Arc::clone(&cache));
        Ok(cache)
    }
}

fn write_page(out: &mut impl Write, session: &CategorySession, items: &[Item]) -> Result<()> {
    writeln!(
        out,
        "{} - page {} of {}",
        session.active_category(),
        session.current_page(),
        session.total_pages()
    )?;
    if items.is_empty() {
        writeln!(out, "(no photos)")?;
    }
    for item in items {
        writeln!(out, "{}\t{}", item.id, item.image_ref)?;
    }
    writeln!(out, "{}", session.window().label())?;
    Ok(())
}
