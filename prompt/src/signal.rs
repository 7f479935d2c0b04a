// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Re-delivers `Ctrl+C` to the process. In raw mode the terminal doesn't generate
//! `SIGINT`, so a prompt that sees the interrupt key raises the signal itself once the
//! terminal has been restored. The default action then terminates the process, and an
//! application that installed its own handler gets to run it first.

use std::{io,
          sync::atomic::{AtomicBool, Ordering}};

/// Set once a progress bar registered a `signal-hook` action for `SIGINT`. The
/// `signal-hook` handler stays installed after its actions are unregistered, and it
/// never falls through to the default action.
static IS_SIGINT_HOOKED: AtomicBool = AtomicBool::new(false);

#[cfg_attr(not(unix), allow(dead_code))]
pub(crate) fn mark_sigint_hooked() { IS_SIGINT_HOOKED.store(true, Ordering::SeqCst); }

#[must_use]
pub fn is_sigint_hooked() -> bool { IS_SIGINT_HOOKED.load(Ordering::SeqCst) }

pub trait InterruptForwarder: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the signal can't be raised.
    fn forward_interrupt(&self) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessInterruptForwarder;

impl InterruptForwarder for ProcessInterruptForwarder {
    /// `raise` runs any handler synchronously. When the handler is the one a progress
    /// bar left behind, the process is still alive afterwards, so the default action
    /// is applied explicitly.
    #[cfg(unix)]
    fn forward_interrupt(&self) -> io::Result<()> {
        use signal_hook::{consts::SIGINT, low_level};

        low_level::raise(SIGINT)?;
        if is_sigint_hooked() {
            tracing::debug!(message = "SIGINT is hooked, applying the default action");
            low_level::emulate_default_handler(SIGINT)?;
        }
        Ok(())
    }

    /// There is no `raise(SIGINT)` equivalent, so exit the way the console's default
    /// `Ctrl+C` handler would.
    #[cfg(not(unix))]
    fn forward_interrupt(&self) -> io::Result<()> {
        std::process::exit(crate::INTERRUPTED_EXIT_CODE)
    }
}
