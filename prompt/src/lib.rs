// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # r3bl-prompt
//!
//! Interactive prompts drawn inline, right where the cursor is, without taking over
//! the whole screen. Each prompt leaves a single summary line behind when it is done.
//!
//! - [`prompt`]: free text entry, coerced into a [`Value`] and checked by
//!   [`validators`]. Rejections are shown on a row above the input line.
//! - [`yes_no`] and [`enter`]: single key confirmations.
//! - [`select`] and [`checklist`]: scrollable lists that grow a search line when
//!   they hold more than a handful of options.
//! - [`Form`]: a sequence of the above with aligned labels.
//! - [`ProgressBar`], [`PercentProgress`], [`TransferProgress`] and
//!   [`MultiProgress`].
//!
//! This crate can also be used as a binary called `rprompt`.
//!
//! ## How to use it as a library?
//!
//! ```no_run
//! use r3bl_prompt::{select, validators, IntWidth, ListConfig, PromptConfig,
//!                   PromptOutcome, SelectOption, TargetKind};
//!
//! fn main() -> miette::Result<()> {
//!     let age = r3bl_prompt::prompt(
//!         "Age",
//!         TargetKind::UInt(IntWidth::W8),
//!         &PromptConfig::default(),
//!         vec![validators::num_range(1.0, 130.0)],
//!     )?;
//!
//!     let colors: Vec<SelectOption<String>> =
//!         ["Red", "Green", "Blue"].into_iter().map(SelectOption::from).collect();
//!     match select("Color", colors, 0, &ListConfig::default())? {
//!         PromptOutcome::Accepted(color) => println!("{age:?} likes {color}"),
//!         PromptOutcome::Escaped | PromptOutcome::Cancelled => {}
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## How the pieces fit together
//!
//! ```text
//! stdin bytes ─► KeyDecoder ─► KeyPress ─► TextInputState / ListState ─► redraw
//!                                                                           │
//!                            TextInputComponent / SelectComponent ◄─────────┘
//! ```
//!
//! [`enter_event_loop`] runs that pipeline inside a [`RawModeGuard`], so the terminal
//! is always restored, even when reading a key fails. `Ctrl+C` cancels the prompt,
//! prints `^C`, and is then re-delivered to the process by an
//! [`InterruptForwarder`].
//!
//! ## Logging
//!
//! Nothing is logged unless [`try_initialize_logging`] is called, and then only to a
//! file, since prompts own the terminal.

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod coerce;
pub mod components;
pub mod constants;
pub mod error;
pub mod event_loop;
pub mod form;
pub mod function_component;
pub mod keypress;
pub mod line_editor;
pub mod misc_types;
pub mod progress;
pub mod public_api;
pub mod scroll;
pub mod signal;
pub mod state;
pub mod term;
pub mod test_utils;
pub mod text_input_state;
pub mod tracing_setup;
pub mod validators;

// Re-export.
pub use coerce::*;
pub use components::*;
pub use constants::*;
pub use error::*;
pub use event_loop::*;
pub use form::*;
pub use function_component::*;
pub use keypress::*;
pub use line_editor::*;
pub use misc_types::*;
pub use progress::*;
pub use public_api::*;
pub use scroll::*;
pub use signal::*;
pub use state::*;
pub use term::*;
pub use text_input_state::*;
pub use tracing_setup::*;
pub use validators::{validate_all, Validator};
