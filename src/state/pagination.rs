// Pagination window controller.
// Computes which page numbers the feed exposes around the current page.

use serde::Serialize;

/// Pages shown on each side of the current page by default.
pub const DEFAULT_RADIUS: u32 = 1;

/// Navigation model for the page selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// Contiguous, ascending page numbers to render.
    pub pages: Vec<u32>,
    /// Page the window was computed for, after clamping.
    pub current: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageWindow {
    pub fn first(&self) -> Option<u32> {
        self.pages.first().copied()
    }

    pub fn last(&self) -> Option<u32> {
        self.pages.last().copied()
    }

    /// Render as a compact selector line, e.g. `< 1 [2] 3 >`.
    pub fn label(&self) -> String {
        let mut parts = Vec::with_capacity(self.pages.len() + 2);
        if self.has_prev {
            parts.push("<".to_string());
        }
        for page in &self.pages {
            if *page == self.current {
                parts.push(format!("[{}]", page));
            } else {
                parts.push(page.to_string());
            }
        }
        if self.has_next {
            parts.push(">".to_string());
        }
        parts.join(" ")
    }
}

/// Compute the page window around `current_page`.
///
/// `total_pages` below 1 is treated as 1 and `current_page` is clamped into
/// `1..=total_pages`, so this never fails. The window starts `radius` pages
/// before the current page and spans at most `2 * radius + 1` pages.
pub fn window(current_page: u32, total_pages: u32, radius: u32) -> PageWindow {
    let total = total_pages.max(1);
    let current = current_page.clamp(1, total);

    let start = current.saturating_sub(radius).max(1);
    let end = start.saturating_add(radius.saturating_mul(2)).min(total);

    PageWindow {
        pages: (start..=end).collect(),
        current,
        has_prev: current > 1,
        has_next: current < total,
    }
}
