// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! An editable line of text, edited in place on the terminal.
//!
//! Every edit returns a [`LinePatch`] that describes the smallest redraw that brings the
//! terminal line in sync with the buffer. The patch is relative to the terminal cursor,
//! which always sits at [`EditableText::cursor`] between edits:
//!
//! ```text
//! buffer:  h e l l o _ w o r l d
//!                    ^ cursor
//! insert('!'):
//!   move_before = 0, suffix = "! world", blank_count = 0, move_after = -6
//! delete_before():
//!   move_before = -1, suffix = " world", blank_count = 1, move_after = -7
//! ```
//!
//! One code point is one column.

/// Redraw instructions for a single edit, applied in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinePatch {
    /// Columns to move before printing (negative is left).
    pub move_before: isize,
    /// Text printed at the new position.
    pub suffix: String,
    /// Columns to blank after the suffix, where the line got shorter.
    pub blank_count: usize,
    /// Columns to move after printing, to land on the new logical cursor.
    pub move_after: isize,
}

impl LinePatch {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.move_before == 0
            && self.suffix.is_empty()
            && self.blank_count == 0
            && self.move_after == 0
    }

    fn cursor_move(delta: isize) -> Self {
        Self {
            move_before: delta,
            ..Default::default()
        }
    }
}

/// A code point buffer with a cursor. `0 <= cursor <= len` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditableText {
    buffer: Vec<char>,
    cursor: usize,
}

impl EditableText {
    /// The cursor defaults to the end of `default_value` and is clipped to its length.
    #[must_use]
    pub fn new(default_value: Option<&str>, initial_cursor: Option<usize>) -> Self {
        let buffer: Vec<char> = default_value.unwrap_or_default().chars().collect();
        let cursor = initial_cursor.unwrap_or(buffer.len()).min(buffer.len());
        Self { buffer, cursor }
    }

    #[must_use]
    pub fn len(&self) -> usize { self.buffer.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    #[must_use]
    pub fn text(&self) -> String { self.buffer.iter().collect() }

    pub fn insert(&mut self, code_point: char) -> LinePatch {
        let old_cursor = self.cursor;
        self.buffer.insert(self.cursor, code_point);
        self.cursor += 1;
        self.patch_from(old_cursor, old_cursor, 0)
    }

    /// No-op at offset 0.
    pub fn delete_before(&mut self) -> LinePatch {
        if self.cursor == 0 {
            return LinePatch::default();
        }
        let old_cursor = self.cursor;
        self.cursor -= 1;
        self.buffer.remove(self.cursor);
        self.patch_from(old_cursor, self.cursor, 1)
    }

    /// No-op at the end of the buffer.
    pub fn delete_at(&mut self) -> LinePatch {
        if self.cursor == self.buffer.len() {
            return LinePatch::default();
        }
        self.buffer.remove(self.cursor);
        self.patch_from(self.cursor, self.cursor, 1)
    }

    /// Clips to `[0, len]`.
    pub fn move_by(&mut self, delta: isize) -> LinePatch {
        let target = self.cursor.saturating_add_signed(delta);
        self.move_to(target)
    }

    /// Clips to `[0, len]`.
    pub fn move_to(&mut self, offset: usize) -> LinePatch {
        let old_cursor = self.cursor;
        self.cursor = offset.min(self.buffer.len());
        LinePatch::cursor_move(signed_distance(old_cursor, self.cursor))
    }

    /// Rewrites everything from `from` to the end of the buffer, then blanks
    /// `blank_count` stale columns.
    fn patch_from(&self, old_cursor: usize, from: usize, blank_count: usize) -> LinePatch {
        let suffix: String = self.buffer[from..].iter().collect();
        let written_until = self.buffer.len() + blank_count;
        LinePatch {
            move_before: signed_distance(old_cursor, from),
            suffix,
            blank_count,
            move_after: signed_distance(written_until, self.cursor),
        }
    }
}

#[allow(clippy::cast_possible_wrap)]
fn signed_distance(from: usize, to: usize) -> isize { to as isize - from as isize }
