// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{Result, Write};

use crossterm::{cursor::{Hide, Show},
                execute,
                queue,
                style::{Print, PrintStyledContent}};

use crate::{FunctionComponent,
            InterruptForwarder,
            KeyPress,
            KeyPressReader,
            PromptError,
            PromptOutcome,
            RawModeGuard,
            StyleSheet,
            TerminalCapability,
            CANCELLED_MARKER,
            LABEL_SEPARATOR};

/// What a key press handler tells the event loop to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventLoopResult<R, T> {
    Continue,
    ContinueAndRerender(R),
    ExitWithResult(T),
    /// Escape.
    ExitWithoutResult,
    /// Interrupt.
    ExitWithInterrupt,
}

/// Runs one prompt in raw mode: draws `function_component`, then feeds key presses to
/// `on_keypress` and applies the redraws it asks for, strictly in key arrival order,
/// until it exits.
///
/// Whichever way the loop ends (result, escape, interrupt or I/O error), the working
/// rows are erased, the cursor is shown again and raw mode is released before this
/// returns.
///
/// # Errors
///
/// Returns [`PromptError::Io`] if reading keys or writing to the terminal fails.
pub fn enter_event_loop<W, S, C, K, T>(
    state: &mut S,
    function_component: &mut C,
    mut on_keypress: impl FnMut(&mut S, KeyPress) -> EventLoopResult<C::Redraw, T>,
    key_press_reader: &mut K,
    terminal: &dyn TerminalCapability,
) -> std::result::Result<PromptOutcome<T>, PromptError>
where
    W: Write,
    C: FunctionComponent<W, S>,
    K: KeyPressReader,
{
    let mut raw_mode_guard = RawModeGuard::acquire(terminal)?;

    let loop_result = run_event_loop(
        state,
        function_component,
        &mut on_keypress,
        key_press_reader,
    );

    // Perform cleanup of raw mode, and show cursor. Each step runs even if an
    // earlier one failed.
    let clear_result = function_component.clear_viewport(state);
    let show_result = execute!(function_component.get_write(), Show);
    let release_result = raw_mode_guard.release();

    let outcome = loop_result?;
    clear_result?;
    show_result?;
    release_result?;
    Ok(outcome)
}

fn run_event_loop<W, S, C, K, T>(
    state: &mut S,
    function_component: &mut C,
    on_keypress: &mut impl FnMut(&mut S, KeyPress) -> EventLoopResult<C::Redraw, T>,
    key_press_reader: &mut K,
) -> Result<PromptOutcome<T>>
where
    W: Write,
    C: FunctionComponent<W, S>,
    K: KeyPressReader,
{
    if function_component.is_cursor_hidden(state) {
        queue!(function_component.get_write(), Hide)?;
    }

    // Only required for the first time to clean up the terminal, and place the cursor at
    // the correct position.
    function_component.allocate_viewport_height_space(state)?;
    function_component.render(state)?;

    loop {
        let key_press = key_press_reader.read_key_press()?;
        match on_keypress(state, key_press) {
            EventLoopResult::Continue => {
                // Noop. Simply continue the loop.
            }
            EventLoopResult::ContinueAndRerender(redraw) => {
                function_component.render_redraw(state, redraw)?;
            }
            EventLoopResult::ExitWithResult(it) => return Ok(PromptOutcome::Accepted(it)),
            EventLoopResult::ExitWithoutResult => return Ok(PromptOutcome::Escaped),
            EventLoopResult::ExitWithInterrupt => return Ok(PromptOutcome::Cancelled),
        }
    }
}

/// Prints the one line result summary where the prompt used to be. For a cancelled
/// prompt the summary is the cancellation marker, and the interrupt is forwarded to the
/// process after the marker is printed.
///
/// Call this after [`enter_event_loop`] returns, once the terminal is back in cooked
/// mode.
///
/// # Errors
///
/// Returns [`PromptError::Io`] if writing the summary or forwarding the interrupt fails.
pub fn finish_prompt<W: Write, T>(
    writer: &mut W,
    style: &StyleSheet,
    label: &str,
    outcome: PromptOutcome<T>,
    summarize: impl FnOnce(&T) -> String,
    interrupt_forwarder: &dyn InterruptForwarder,
) -> std::result::Result<PromptOutcome<T>, PromptError> {
    let summary = match &outcome {
        PromptOutcome::Accepted(it) => summarize(it),
        PromptOutcome::Cancelled => CANCELLED_MARKER.to_string(),
        PromptOutcome::Escaped => String::new(),
    };

    queue!(
        writer,
        PrintStyledContent(style.label_style.apply(label)),
        Print(LABEL_SEPARATOR.trim_end()),
    )?;
    if !summary.is_empty() {
        queue!(
            writer,
            Print(" "),
            PrintStyledContent(style.summary_style.apply(summary)),
        )?;
    }
    queue!(writer, Print("\n"))?;
    writer.flush()?;

    if let PromptOutcome::Cancelled = outcome {
        tracing::debug!(message = "interrupt forwarded", label);
        interrupt_forwarder.forward_interrupt()?;
    }

    Ok(outcome)
}
