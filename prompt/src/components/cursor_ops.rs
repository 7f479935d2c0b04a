// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Relative cursor movement. Terminals treat a move by 0 as a move by 1, so these
//! helpers skip zero distance moves entirely.

use std::{cmp::Ordering,
          io::{Result, Write}};

use crossterm::{cursor::{MoveDown, MoveLeft, MoveRight, MoveUp},
                queue,
                style::Print};

use crate::LinePatch;

fn to_u16(distance: usize) -> u16 { u16::try_from(distance).unwrap_or(u16::MAX) }

/// Negative is left.
pub fn queue_move_cols(writer: &mut impl Write, delta: isize) -> Result<()> {
    let distance = to_u16(delta.unsigned_abs());
    match delta.cmp(&0) {
        Ordering::Less => queue!(writer, MoveLeft(distance)),
        Ordering::Greater => queue!(writer, MoveRight(distance)),
        Ordering::Equal => Ok(()),
    }
}

/// Negative is up.
pub fn queue_move_rows(writer: &mut impl Write, delta: isize) -> Result<()> {
    let distance = to_u16(delta.unsigned_abs());
    match delta.cmp(&0) {
        Ordering::Less => queue!(writer, MoveUp(distance)),
        Ordering::Greater => queue!(writer, MoveDown(distance)),
        Ordering::Equal => Ok(()),
    }
}

#[allow(clippy::cast_possible_wrap)]
pub fn queue_move_rows_down(writer: &mut impl Write, rows: usize) -> Result<()> {
    queue_move_rows(writer, rows as isize)
}

#[allow(clippy::cast_possible_wrap)]
pub fn queue_move_rows_up(writer: &mut impl Write, rows: usize) -> Result<()> {
    queue_move_rows(writer, -(rows as isize))
}

/// Applies a line editor patch at the current cursor position.
pub fn queue_line_patch(writer: &mut impl Write, patch: &LinePatch) -> Result<()> {
    queue_move_cols(writer, patch.move_before)?;
    if !patch.suffix.is_empty() {
        queue!(writer, Print(&patch.suffix))?;
    }
    if patch.blank_count > 0 {
        queue!(writer, Print(" ".repeat(patch.blank_count)))?;
    }
    queue_move_cols(writer, patch.move_after)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_utils::StdoutMock;

    #[test]
    fn test_zero_moves_emit_nothing() {
        let mut stdout_mock = StdoutMock::default();
        queue_move_cols(&mut stdout_mock, 0).unwrap();
        queue_move_rows(&mut stdout_mock, 0).unwrap();
        queue_line_patch(&mut stdout_mock, &LinePatch::default()).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");
    }

    #[test]
    fn test_moves() {
        let mut stdout_mock = StdoutMock::default();
        queue_move_cols(&mut stdout_mock, -3).unwrap();
        queue_move_cols(&mut stdout_mock, 2).unwrap();
        queue_move_rows(&mut stdout_mock, -1).unwrap();
        queue_move_rows(&mut stdout_mock, 4).unwrap();
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[3D\x1b[2C\x1b[1A\x1b[4B"
        );
    }

    #[test]
    fn test_line_patch() {
        let mut stdout_mock = StdoutMock::default();
        let patch = LinePatch {
            move_before: -1,
            suffix: "world".into(),
            blank_count: 1,
            move_after: -6,
        };
        queue_line_patch(&mut stdout_mock, &patch).unwrap();
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[1Dworld \x1b[6D"
        );
    }
}
