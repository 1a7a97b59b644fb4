//! Layout Module - Page geometry and viewport intersection.
//!
//! - [`taffy_bridge`] lays out the page as nested column flexboxes with Taffy
//!   and flattens the result into absolute [`Rect`]s.
//! - [`Viewport`] + [`intersection_ratio`] turn those rects into the visible
//!   fractions the visibility watcher consumes.

mod taffy_bridge;

pub use taffy_bridge::{compute_page_layout, Block, PageLayout};

use crate::types::Rect;

// =============================================================================
// VIEWPORT
// =============================================================================

/// The visible window onto the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_y: f32,
    pub height: f32,
    /// Shrinks the effective viewport from the bottom, so elements must scroll
    /// this far past the fold before they count as visible.
    pub root_margin_bottom: f32,
}

impl Viewport {
    pub fn new(scroll_y: f32, height: f32) -> Self {
        Self {
            scroll_y,
            height,
            root_margin_bottom: 0.0,
        }
    }

    pub fn with_root_margin_bottom(mut self, margin: f32) -> Self {
        self.root_margin_bottom = margin;
        self
    }

    pub fn top(&self) -> f32 {
        self.scroll_y
    }

    /// Bottom edge after applying the root margin.
    pub fn bottom(&self) -> f32 {
        self.scroll_y + (self.height - self.root_margin_bottom).max(0.0)
    }

    pub fn scrolled_to(mut self, scroll_y: f32) -> Self {
        self.scroll_y = scroll_y.max(0.0);
        self
    }
}

/// Fraction of `rect` inside the viewport, in `[0, 1]`.
///
/// Only the vertical axis matters for a scrolling page. A zero-height element
/// counts as fully visible when its top edge lies inside the viewport.
pub fn intersection_ratio(rect: &Rect, viewport: &Viewport) -> f32 {
    let top = viewport.top();
    let bottom = viewport.bottom();

    if rect.height <= 0.0 {
        return if rect.y >= top && rect.y <= bottom { 1.0 } else { 0.0 };
    }

    let overlap = rect.bottom().min(bottom) - rect.y.max(top);
    (overlap / rect.height).clamp(0.0, 1.0)
}
