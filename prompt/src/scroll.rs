// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! ### Vertical scrolling and viewport
//!
//! Only `height` rows of the (filtered) list are visible. `start` is the index of the
//! first visible item.
//!
//! ```text
//!                    +0--------------------+
//!                    |                     |
//!                    |        above        |
//!                    |                     |
//!                    +------- start -------+
//!                    | scroll_margin       |      ↑
//!                    |- - - - - - - - - - -|      |
//!                    |                     |   height
//!                    |  selection moves    |      |
//!                    |  without scrolling  |      |
//!                    |- - - - - - - - - - -|      |
//!                    | scroll_margin       |      ↓
//!                    +--- start + height --+
//!                    |        below        |
//!                    +---------------------+ <- count
//! ```
//!
//! The viewport only scrolls once the selection enters a margin band, which keeps the
//! window still while the selection moves around the middle. On a full reset (first
//! render, or the filter changed) the selection is centered instead.
//!
//! Invariants, for every `count` and selection:
//! - `0 <= start <= count - height`
//! - `start <= selection < start + height`

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// `min(configured max, terminal rows - 1)`, never less than 1.
    pub max_height: usize,
    pub configured_margin: usize,
    /// Number of visible rows, `min(max_height, count)`.
    pub height: usize,
    pub start: usize,
    pub scroll_margin: usize,
}

impl Viewport {
    /// One terminal row is taken by the prompt line, so at most `terminal_rows - 1`
    /// items can be shown.
    #[must_use]
    pub fn new(max_visible_lines: usize, terminal_rows: usize, scroll_margin: usize) -> Self {
        let max_height = max_visible_lines
            .min(terminal_rows.saturating_sub(1))
            .max(1);
        Self {
            max_height,
            configured_margin: scroll_margin,
            height: 0,
            start: 0,
            scroll_margin: 0,
        }
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> { self.start..self.start + self.height }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool { self.range().contains(&index) }

    /// Recomputes `height` and `scroll_margin` for `count` items and centers `selection`.
    pub fn reset(&mut self, selection: usize, count: usize) {
        self.height = self.max_height.min(count);
        self.scroll_margin = self
            .configured_margin
            .min(self.height.saturating_sub(1) / 2);
        let centered = selection.saturating_sub(self.height.saturating_sub(1) / 2);
        self.start = centered.min(self.max_start(count));
    }

    /// Scrolls just enough to keep `scroll_margin` rows between `selection` and the
    /// edge it moved towards. Returns whether `start` changed.
    pub fn follow(&mut self, old_selection: usize, selection: usize, count: usize) -> bool {
        let old_start = self.start;
        if selection < old_selection {
            if selection < self.start + self.scroll_margin {
                self.start = selection.saturating_sub(self.scroll_margin);
            }
        } else if selection > old_selection
            && selection + self.scroll_margin >= self.start + self.height
        {
            self.start = (selection + self.scroll_margin + 1)
                .saturating_sub(self.height)
                .min(self.max_start(count));
        }
        let did_scroll = old_start != self.start;
        if did_scroll {
            tracing::trace!(message = "viewport scrolled", old_start, start = self.start);
        }
        did_scroll
    }

    fn max_start(&self, count: usize) -> usize { count.saturating_sub(self.height) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_invariants(viewport: &Viewport, selection: usize, count: usize) {
        if count == 0 {
            assert_eq!(viewport.height, 0);
            return;
        }
        assert!(viewport.start <= count - viewport.height);
        assert!(viewport.start <= selection);
        assert!(selection < viewport.start + viewport.height);
    }

    #[test]
    fn test_reset_centers_selection() {
        // [Red, Orange, Green, Yellow, Blue, Purple] with Yellow selected.
        let mut viewport = Viewport::new(4, 24, 1);
        viewport.reset(3, 6);
        assert_eq!(viewport.height, 4);
        assert_eq!(viewport.start, 2);
        assert_eq!(viewport.range(), 2..6);
    }

    #[test]
    fn test_height_is_limited_by_terminal_rows() {
        let mut viewport = Viewport::new(10, 5, 2);
        viewport.reset(0, 100);
        assert_eq!(viewport.height, 4);
        assert_eq!(viewport.scroll_margin, 1);
    }

    #[test]
    fn test_margin_is_limited_by_height() {
        let mut viewport = Viewport::new(2, 24, 5);
        viewport.reset(0, 10);
        assert_eq!(viewport.scroll_margin, 0);
    }

    #[test]
    fn test_no_scroll_in_middle() {
        let mut viewport = Viewport::new(7, 24, 2);
        viewport.reset(0, 20);
        assert!(!viewport.follow(0, 1, 20));
        assert!(!viewport.follow(1, 2, 20));
        assert!(!viewport.follow(2, 3, 20));
        assert_eq!(viewport.start, 0);
        // 4 + 2 >= 0 + 7 is false, 5 + 2 >= 7 is true.
        assert!(!viewport.follow(3, 4, 20));
        assert!(viewport.follow(4, 5, 20));
        assert_eq!(viewport.start, 1);
    }

    #[test]
    fn test_scroll_up_keeps_margin() {
        let mut viewport = Viewport::new(5, 24, 1);
        viewport.reset(10, 20);
        assert_eq!(viewport.start, 8);
        assert!(!viewport.follow(10, 9, 20));
        assert!(viewport.follow(9, 8, 20));
        assert_eq!(viewport.start, 7);
    }

    #[test]
    fn test_jumps_keep_invariants() {
        let count = 37;
        let mut viewport = Viewport::new(6, 24, 2);
        viewport.reset(0, count);
        let mut selection = 0;
        for next in [36, 0, 17, 18, 30, 5, 6, 36, 35, 1] {
            viewport.follow(selection, next, count);
            selection = next;
            assert_invariants(&viewport, selection, count);
        }
    }

    #[test]
    fn test_invariants_for_all_small_lists() {
        for count in 0..15 {
            for max in 1..8 {
                for margin in 0..4 {
                    for initial in 0..count.max(1) {
                        let mut viewport = Viewport::new(max, 24, margin);
                        viewport.reset(initial, count);
                        assert_invariants(&viewport, initial, count);
                        let mut selection = initial;
                        for next in (0..count).chain((0..count).rev()) {
                            viewport.follow(selection, next, count);
                            selection = next;
                            assert_invariants(&viewport, selection, count);
                        }
                    }
                }
            }
        }
    }
}
