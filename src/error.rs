// Error types for frames.
// Separates local storage failures, remote fetch failures and navigation rejections.

use thiserror::Error;

use crate::cache::FetchError;

#[derive(Error, Debug)]
pub enum FramesError {
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt cache entry {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Page {page} is outside 1..={total}")]
    OutOfRange { page: u32, total: u32 },

    #[error("Invalid category name: {0:?}")]
    InvalidCategory(String),

    #[error("Invalid cache key: {0:?}")]
    InvalidKey(String),

    #[error("Missing FLICKR_API_KEY (set it in the environment or config.toml)")]
    MissingApiKey,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl FramesError {
    /// Local storage is unavailable or holds an unreadable value.
    pub fn is_storage(&self) -> bool {
        matches!(self, FramesError::Io(_) | FramesError::Corrupt { .. })
    }

    /// The remote failed in a way that is worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, FramesError::Fetch(FetchError::Transient(_)))
    }

    /// The remote will never serve this request.
    pub fn is_permanent(&self) -> bool {
        matches!(self, FramesError::Fetch(FetchError::Permanent(_)))
    }
}

pub type Result<T> = std::result::Result<T, FramesError>;
