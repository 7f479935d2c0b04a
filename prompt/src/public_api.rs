// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{self, Write},
          sync::Arc};

use crossterm::{queue, style::Print};

use crate::{enter_event_loop,
            finish_prompt,
            is_fully_interactive_terminal,
            CrosstermTerminal,
            InterruptForwarder,
            KeyPressReader,
            ListConfig,
            ListState,
            OptionSet,
            ProcessInterruptForwarder,
            PromptConfig,
            PromptError,
            PromptOutcome,
            SelectComponent,
            SelectOption,
            SelectionMode,
            StdinKeyDecoder,
            StyleSheet,
            TTYResult,
            TargetKind,
            TerminalCapability,
            TextInputComponent,
            TextInputState,
            Validator,
            Value};

/// Owns everything a prompt talks to: where it draws, where keys come from, the raw mode
/// capability, and what happens to `Ctrl+C`. Prompts run one after another, each one
/// leaving a single summary line behind.
///
/// Use [`PromptSession::try_new_stdio`] for the real terminal, or inject the mocks from
/// [`crate::test_utils`] to drive prompts from tests.
pub struct PromptSession<W: Write, K: KeyPressReader> {
    output: W,
    input: K,
    terminal: Arc<dyn TerminalCapability>,
    interrupt_forwarder: Arc<dyn InterruptForwarder>,
    style: StyleSheet,
}

impl<W: Write, K: KeyPressReader> std::fmt::Debug for PromptSession<W, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptSession")
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

pub type StdioPromptSession = PromptSession<io::Stdout, StdinKeyDecoder>;

impl StdioPromptSession {
    /// # Errors
    ///
    /// Returns [`PromptError::NotInteractive`] if stdin or stdout is not a terminal, so
    /// that prompts never block `cargo test` or CI jobs.
    pub fn try_new_stdio() -> Result<Self, PromptError> {
        if is_fully_interactive_terminal() == TTYResult::IsNotInteractive {
            return Err(PromptError::NotInteractive);
        }
        Ok(PromptSession::new(
            io::stdout(),
            StdinKeyDecoder::new_stdin(),
            Arc::new(CrosstermTerminal),
            Arc::new(ProcessInterruptForwarder),
        ))
    }
}

impl<W: Write, K: KeyPressReader> PromptSession<W, K> {
    pub fn new(
        output: W,
        input: K,
        terminal: Arc<dyn TerminalCapability>,
        interrupt_forwarder: Arc<dyn InterruptForwarder>,
    ) -> Self {
        Self {
            output,
            input,
            terminal,
            interrupt_forwarder,
            style: StyleSheet::default(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: StyleSheet) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn output(&self) -> &W { &self.output }

    #[must_use]
    pub fn output_mut(&mut self) -> &mut W { &mut self.output }

    /// Reads a line and converts it to `kind`. `validators` run in order on the converted
    /// value, and a rejection is shown above the input line until the user submits
    /// something that passes. Boolean kinds take a single `y` / `n` style key instead of
    /// a line.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::DestinationMismatch`] before touching the terminal when the
    /// default value doesn't fit `kind`, and [`PromptError::Io`] if the terminal fails.
    pub fn prompt(
        &mut self,
        label: &str,
        kind: TargetKind,
        config: &PromptConfig,
        validators: Vec<Validator>,
    ) -> Result<PromptOutcome<Value>, PromptError> {
        if let Some(default) = config.default.as_ref().filter(|it| !kind.accepts(it)) {
            return Err(PromptError::DestinationMismatch {
                expected: kind.kind_name(),
                found: default.kind_name(),
            });
        }
        let mut state = TextInputState::new(kind, config, validators);
        self.run_text_input(label, &mut state)
    }

    /// # Errors
    ///
    /// Returns [`PromptError::Io`] if the terminal fails.
    pub fn yes_no(
        &mut self,
        label: &str,
        default: Option<bool>,
    ) -> Result<PromptOutcome<bool>, PromptError> {
        let mut state = TextInputState::new_yes_no(default);
        let outcome = self.run_text_input(label, &mut state)?;
        Ok(outcome.map(|it| it == Value::Bool(true)))
    }

    /// Waits for Enter.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Io`] if the terminal fails.
    pub fn enter(&mut self, label: &str) -> Result<PromptOutcome<()>, PromptError> {
        let mut state = TextInputState::new_await_enter();
        let outcome = self.run_text_input(label, &mut state)?;
        Ok(outcome.map(|_| ()))
    }

    fn run_text_input(
        &mut self,
        label: &str,
        state: &mut TextInputState,
    ) -> Result<PromptOutcome<Value>, PromptError> {
        let mut function_component = TextInputComponent {
            write: &mut self.output,
            style: self.style,
            label: label.to_string(),
        };
        let outcome = enter_event_loop(
            state,
            &mut function_component,
            |state, key_press| state.handle_key(key_press),
            &mut self.input,
            self.terminal.as_ref(),
        )?;
        finish_prompt(
            &mut self.output,
            &self.style,
            label,
            outcome,
            ToString::to_string,
            self.interrupt_forwarder.as_ref(),
        )
    }

    /// Picks one option. `initial` is clipped into the list.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty or oversized option list, and
    /// [`PromptError::Io`] if the terminal fails.
    pub fn select<T>(
        &mut self,
        label: &str,
        options: Vec<SelectOption<T>>,
        initial: usize,
        config: &ListConfig,
    ) -> Result<PromptOutcome<T>, PromptError> {
        let outcome =
            self.run_list(label, options, SelectionMode::Single, initial, &[], config)?;
        Ok(match outcome {
            PromptOutcome::Accepted(mut values) if !values.is_empty() => {
                PromptOutcome::Accepted(values.swap_remove(0))
            }
            PromptOutcome::Accepted(_) | PromptOutcome::Escaped => PromptOutcome::Escaped,
            PromptOutcome::Cancelled => PromptOutcome::Cancelled,
        })
    }

    /// Checks any number of options, starting with the `checked` indices. Returns the
    /// checked values in their original order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty or oversized option list, and
    /// [`PromptError::Io`] if the terminal fails.
    pub fn checklist<T>(
        &mut self,
        label: &str,
        options: Vec<SelectOption<T>>,
        checked: &[usize],
        config: &ListConfig,
    ) -> Result<PromptOutcome<Vec<T>>, PromptError> {
        self.run_list(label, options, SelectionMode::Multiple, 0, checked, config)
    }

    fn run_list<T>(
        &mut self,
        label: &str,
        options: Vec<SelectOption<T>>,
        selection_mode: SelectionMode,
        initial: usize,
        checked: &[usize],
        config: &ListConfig,
    ) -> Result<PromptOutcome<Vec<T>>, PromptError> {
        config.validate()?;
        let option_set = OptionSet::try_new(options, config.max_option_count)?;
        let labels = option_set.labels();
        let size = self.terminal.size_or_default();

        let mut state =
            ListState::new(labels.clone(), initial, selection_mode, size.row_count, config)
                .with_checked(checked);
        let mut function_component = SelectComponent {
            write: &mut self.output,
            style: self.style,
            label: label.to_string(),
            max_width: size.col_count,
        };
        let outcome = enter_event_loop(
            &mut state,
            &mut function_component,
            |state, key_press| state.handle_key(key_press),
            &mut self.input,
            self.terminal.as_ref(),
        )?;

        let outcome = finish_prompt(
            &mut self.output,
            &self.style,
            label,
            outcome,
            |indices: &Vec<usize>| {
                indices
                    .iter()
                    .filter_map(|&index| labels.get(index).map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(", ")
            },
            self.interrupt_forwarder.as_ref(),
        )?;
        Ok(outcome.map(|indices| option_set.take_values(&indices)))
    }

    /// Prints a line of plain text, for headings between prompts.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Io`] if writing fails.
    pub fn print(&mut self, text: &str) -> Result<(), PromptError> {
        queue!(self.output, Print(text), Print("\n"))?;
        self.output.flush()?;
        Ok(())
    }
}

/// [`PromptSession::prompt`] on the real terminal.
///
/// # Errors
///
/// See [`PromptSession::try_new_stdio`] and [`PromptSession::prompt`].
pub fn prompt(
    label: &str,
    kind: TargetKind,
    config: &PromptConfig,
    validators: Vec<Validator>,
) -> Result<PromptOutcome<Value>, PromptError> {
    StdioPromptSession::try_new_stdio()?.prompt(label, kind, config, validators)
}

/// [`PromptSession::yes_no`] on the real terminal.
///
/// # Errors
///
/// See [`PromptSession::try_new_stdio`] and [`PromptSession::yes_no`].
pub fn yes_no(
    label: &str,
    default: Option<bool>,
) -> Result<PromptOutcome<bool>, PromptError> {
    StdioPromptSession::try_new_stdio()?.yes_no(label, default)
}

/// [`PromptSession::enter`] on the real terminal.
///
/// # Errors
///
/// See [`PromptSession::try_new_stdio`] and [`PromptSession::enter`].
pub fn enter(label: &str) -> Result<PromptOutcome<()>, PromptError> {
    StdioPromptSession::try_new_stdio()?.enter(label)
}

/// [`PromptSession::select`] on the real terminal.
///
/// # Errors
///
/// See [`PromptSession::try_new_stdio`] and [`PromptSession::select`].
pub fn select<T>(
    label: &str,
    options: Vec<SelectOption<T>>,
    initial: usize,
    config: &ListConfig,
) -> Result<PromptOutcome<T>, PromptError> {
    StdioPromptSession::try_new_stdio()?.select(label, options, initial, config)
}

/// [`PromptSession::checklist`] on the real terminal.
///
/// # Errors
///
/// See [`PromptSession::try_new_stdio`] and [`PromptSession::checklist`].
pub fn checklist<T>(
    label: &str,
    options: Vec<SelectOption<T>>,
    checked: &[usize],
    config: &ListConfig,
) -> Result<PromptOutcome<Vec<T>>, PromptError> {
    StdioPromptSession::try_new_stdio()?.checklist(label, options, checked, config)
}
