//! Page-boundary navigation state.

use serde::Serialize;

use crate::model::PageIndex;

/// Navigation controls for one page of a run.
///
/// A disabled control is both inert and rendered muted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavState {
    pub current: PageIndex,
    pub total: u32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub label: String,
}

/// Compute navigation state for `current` out of `total` pages.
///
/// A `current` beyond `total` is passed through unchanged: the label reports
/// it as given, previous stays enabled and next is disabled.
pub fn compute_nav_state(current: PageIndex, total: u32) -> NavState {
    let page = current.get();
    NavState {
        current,
        total,
        prev_enabled: page > 1,
        next_enabled: page < total,
        label: format!("Page {} of {}", page, total),
    }
}

impl NavState {
    /// Target of the previous control, if enabled.
    pub fn prev_page(&self) -> Option<PageIndex> {
        if self.prev_enabled {
            self.current.previous()
        } else {
            None
        }
    }

    /// Target of the next control, if enabled.
    pub fn next_page(&self) -> Option<PageIndex> {
        if self.next_enabled {
            self.current.next()
        } else {
            None
        }
    }
}
