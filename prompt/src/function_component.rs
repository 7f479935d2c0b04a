// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{Result, Write};

use crossterm::{cursor::{MoveToColumn, MoveToPreviousLine},
                queue,
                style::Print,
                terminal::{Clear, ClearType}};

use crate::queue_move_rows_up;

/// A prompt widget that draws on a block of rows starting at the current terminal
/// line. Between key presses the terminal cursor always rests at the "ready" position,
/// where the next typed character would appear.
pub trait FunctionComponent<W: Write, S> {
    /// Describes what changed after a key press.
    type Redraw;

    fn get_write(&mut self) -> &mut W;

    /// All the rows this component draws on, including the prompt line.
    fn calculate_viewport_height(&self, state: &S) -> usize;

    /// Number of working rows above the row the cursor rests on.
    fn calculate_rows_above_cursor(&self, _state: &S) -> usize { 0 }

    fn is_cursor_hidden(&self, state: &S) -> bool;

    /// Draws everything, starting on the current row, and leaves the cursor at the ready
    /// position.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    fn render(&mut self, state: &S) -> Result<()>;

    /// Repaints only what `redraw` says changed, and leaves the cursor at the ready
    /// position.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    fn render_redraw(&mut self, state: &S, redraw: Self::Redraw) -> Result<()>;

    /// Makes sure there are enough rows below the cursor, by scrolling the terminal if
    /// needed, so that moving the cursor down later always works.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    fn allocate_viewport_height_space(&mut self, state: &S) -> Result<()> {
        let rows_below = self.calculate_viewport_height(state).saturating_sub(1);
        let writer = self.get_write();

        queue!(writer, MoveToColumn(0))?;
        if rows_below > 0 {
            // Allocate space.
            for _ in 0..rows_below {
                queue!(writer, Print("\n"))?;
            }
            // Move the cursor back up.
            queue!(
                writer,
                MoveToPreviousLine(u16::try_from(rows_below).unwrap_or(u16::MAX))
            )?;
        }
        Ok(())
    }

    /// Erases every working row and leaves the cursor at column 0 of the top one, so the
    /// one line summary can take its place.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    fn clear_viewport(&mut self, state: &S) -> Result<()> {
        let rows_above = self.calculate_rows_above_cursor(state);
        let writer = self.get_write();
        queue!(writer, MoveToColumn(0))?;
        queue_move_rows_up(writer, rows_above)?;
        queue!(writer, Clear(ClearType::FromCursorDown))?;
        writer.flush()
    }
}
