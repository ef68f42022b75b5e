//! FRAMES - a categorized, paginated photo feed.
//!
//! The core is [`cache::PageCache`], which serves each (category, page) from a
//! durable store and only goes to the remote on a miss, plus the
//! [`state::CategorySession`] and pagination window built on top of it.

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod flickr;
pub mod model;
pub mod state;

pub use error::{FramesError, Result};

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
