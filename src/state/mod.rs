// State management module.
// Handles the browsing session and the pagination window derived from it.

pub mod pagination;
pub mod session;

pub use pagination::{DEFAULT_RADIUS, PageWindow, window};
pub use session::CategorySession;
