#![forbid(unsafe_code)]

//! Scroll state and incremental loading.
//!
//! The list mounts a prefix of its records. Whenever the bottom edge of the
//! viewport passes `ratio` of the content height and records remain, the
//! next batch of `load_amount` records is mounted.

use std::ops::Range;

/// A snapshot of the viewport against the content, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    /// First visible row.
    pub scroll_top: usize,
    /// Visible rows.
    pub client_height: usize,
    /// Total rendered rows.
    pub scroll_height: usize,
}

impl ScrollMetrics {
    /// Bottom edge over content height; `None` for empty content.
    #[must_use]
    pub fn ratio(&self) -> Option<f64> {
        if self.scroll_height == 0 {
            return None;
        }
        Some((self.scroll_top + self.client_height) as f64 / self.scroll_height as f64)
    }
}

/// Decides when and what to load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollLoader {
    load_amount: usize,
    ratio: f64,
}

impl ScrollLoader {
    /// Create a loader; see [`TableListConfig`](crate::config::TableListConfig).
    #[must_use]
    pub const fn new(load_amount: usize, ratio: f64) -> Self {
        Self { load_amount, ratio }
    }

    /// Batch size.
    #[must_use]
    pub const fn load_amount(&self) -> usize {
        self.load_amount
    }

    /// Rows below which new top-level records mount on insertion.
    #[must_use]
    pub fn insert_window(&self, loaded: usize) -> usize {
        loaded.max(self.load_amount)
    }

    /// Whether the viewport is deep enough to load more.
    #[must_use]
    pub fn should_load(&self, metrics: ScrollMetrics, loaded: usize, total: usize) -> bool {
        loaded < total && metrics.ratio().is_some_and(|r| r > self.ratio)
    }

    /// Indices of the next batch.
    #[must_use]
    pub fn next_batch(&self, loaded: usize, total: usize) -> Range<usize> {
        loaded..loaded.saturating_add(self.load_amount).min(total)
    }
}

/// Viewport position, clamped to the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    offset: usize,
    viewport: u16,
}

impl ScrollState {
    /// Create a state with the given viewport height.
    #[must_use]
    pub const fn new(viewport: u16) -> Self {
        Self {
            offset: 0,
            viewport,
        }
    }

    /// First visible row.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Visible rows.
    #[must_use]
    pub const fn viewport(&self) -> u16 {
        self.viewport
    }

    /// Largest valid offset for `content` rows.
    #[must_use]
    pub fn max_offset(&self, content: usize) -> usize {
        content.saturating_sub(self.viewport as usize)
    }

    /// Jump to `offset`. Returns whether the position changed.
    pub fn scroll_to(&mut self, offset: usize, content: usize) -> bool {
        let clamped = offset.min(self.max_offset(content));
        let changed = clamped != self.offset;
        self.offset = clamped;
        changed
    }

    /// Move by `delta` rows (positive is down).
    pub fn scroll_by(&mut self, delta: isize, content: usize) -> bool {
        let target = self.offset.saturating_add_signed(delta);
        self.scroll_to(target, content)
    }

    /// Scroll the minimum needed to show `row`.
    pub fn reveal(&mut self, row: usize, content: usize) -> bool {
        let height = self.viewport as usize;
        if row < self.offset {
            self.scroll_to(row, content)
        } else if height > 0 && row >= self.offset + height {
            self.scroll_to(row + 1 - height, content)
        } else {
            false
        }
    }

    /// Change the viewport height and re-clamp.
    pub fn resize(&mut self, viewport: u16, content: usize) {
        self.viewport = viewport;
        self.offset = self.offset.min(self.max_offset(content));
    }

    /// Back to the top.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Metrics for `content` rows.
    #[must_use]
    pub fn metrics(&self, content: usize) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.offset,
            client_height: self.viewport as usize,
            scroll_height: content,
        }
    }

    /// Visible row range for `content` rows.
    #[must_use]
    pub fn visible(&self, content: usize) -> Range<usize> {
        let start = self.offset.min(content);
        start..(start + self.viewport as usize).min(content)
    }
}
