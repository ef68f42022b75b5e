// Remote page fetcher port.
// Defines the fetch contract, its failure classes, and a retrying wrapper.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::model::{Category, Item};

/// Why a remote fetch produced no data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Network trouble, timeout, throttling or an unreadable response.
    #[error("Remote temporarily unavailable: {0}")]
    Transient(String),
    /// The remote will never serve this category or page.
    #[error("Remote rejected request: {0}")]
    Permanent(String),
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }
}

/// One page of results as reported by the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub items: Vec<Item>,
    /// Remote's current total page count for the category, at least 1.
    pub total_pages: u32,
}

/// Port for retrieving a page of photos from the remote source.
/// Implementations own their timeouts and must resolve rather than hang.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, category: &Category, page: u32) -> Result<FetchedPage, FetchError>;
}

/// Backoff schedule for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-based): base * 2^attempt, capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Fetcher that retries transient failures of an inner fetcher with exponential backoff.
pub struct RetryingFetcher<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F: PageFetcher> RetryingFetcher<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for RetryingFetcher<F> {
    async fn fetch(&self, category: &Category, page: u32) -> Result<FetchedPage, FetchError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            match self.inner.fetch(category, page).await {
                Err(FetchError::Transient(reason)) if attempt + 1 < attempts => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        %category,
                        page,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        %reason,
                        "Transient fetch failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
