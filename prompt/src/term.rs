// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Terminal capabilities consumed by the prompts: raw mode and geometry.
//!
//! Raw mode turns off echo, canonical (line) buffering and the signal generating
//! control characters. `Ctrl+C` then reaches the [`crate::KeyDecoder`] as the byte
//! `0x03`, which the prompts turn into a cancellation followed by a re-raised `SIGINT`
//! (see [`crate::InterruptForwarder`]).

use std::io::{self, IsTerminal as _};

use crate::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub col_count: usize,
    pub row_count: usize,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            col_count: DEFAULT_WIDTH,
            row_count: DEFAULT_HEIGHT,
        }
    }
}

/// The OS level terminal operations a prompt needs. Swap this out in tests with
/// [`crate::test_utils::TerminalMock`].
pub trait TerminalCapability: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the terminal attributes can't be changed.
    fn enable_raw_mode(&self) -> io::Result<()>;

    /// Must be safe to call when raw mode is not enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal attributes can't be restored.
    fn disable_raw_mode(&self) -> io::Result<()>;

    /// # Errors
    ///
    /// Returns an error if the terminal size can't be queried.
    fn size(&self) -> io::Result<Size>;

    /// Falls back to [`Size::default`] when the query fails.
    fn size_or_default(&self) -> Size { self.size().unwrap_or_default() }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermTerminal;

impl TerminalCapability for CrosstermTerminal {
    fn enable_raw_mode(&self) -> io::Result<()> { crossterm::terminal::enable_raw_mode() }

    fn disable_raw_mode(&self) -> io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }

    fn size(&self) -> io::Result<Size> {
        let (columns, rows) = crossterm::terminal::size()?;
        Ok(Size {
            col_count: usize::from(columns),
            row_count: usize::from(rows),
        })
    }
}

/// RAII guard that disables raw mode when dropped, so the terminal is restored on every
/// exit path, including errors and panics. [`RawModeGuard::release`] restores it early
/// and makes the drop a no-op.
pub struct RawModeGuard<'a> {
    terminal: &'a dyn TerminalCapability,
    is_released: bool,
}

impl std::fmt::Debug for RawModeGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawModeGuard")
            .field("is_released", &self.is_released)
            .finish_non_exhaustive()
    }
}

impl<'a> RawModeGuard<'a> {
    /// # Errors
    ///
    /// Returns an error if raw mode can't be enabled. Nothing needs to be restored in
    /// that case.
    pub fn acquire(terminal: &'a dyn TerminalCapability) -> io::Result<Self> {
        terminal.enable_raw_mode()?;
        tracing::debug!(message = "raw mode acquired");
        Ok(Self {
            terminal,
            is_released: false,
        })
    }

    /// Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal attributes can't be restored.
    pub fn release(&mut self) -> io::Result<()> {
        if self.is_released {
            return Ok(());
        }
        self.is_released = true;
        tracing::debug!(message = "raw mode released");
        self.terminal.disable_raw_mode()
    }
}

impl Drop for RawModeGuard<'_> {
    fn drop(&mut self) { drop(self.release()); }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TTYResult {
    IsInteractive,
    IsNotInteractive,
}

/// Returns [`TTYResult::IsInteractive`] if stdin and stdout are both terminals. Prompts
/// read keys from stdin and draw on stdout, so both have to be interactive.
#[must_use]
pub fn is_fully_interactive_terminal() -> TTYResult {
    if std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
        TTYResult::IsInteractive
    } else {
        TTYResult::IsNotInteractive
    }
}
