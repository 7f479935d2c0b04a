// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The state machine behind the text, yes / no and "press enter" prompts.
//!
//! A submitted line is coerced and validated. A rejection moves the prompt from
//! [`InputPhase::Editing`] to [`InputPhase::ReportingError`], which shows the message
//! above the input line and keeps the entered text. The user keeps editing in that
//! phase, and the next submit either replaces the message or finishes the prompt.

use crate::{parse_bool,
            validate_all,
            EditableText,
            EventLoopResult,
            KeyPress,
            LinePatch,
            PromptConfig,
            TargetKind,
            Validator,
            Value,
            ENTER_HINT,
            YES_NO_HINT,
            YES_NO_HINT_DEFAULT_NO,
            YES_NO_HINT_DEFAULT_YES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// General line editing.
    Edit,
    /// A single key answers the prompt. The character buffer isn't used.
    YesNo { default: Option<bool> },
    /// Only Enter does anything.
    AwaitEnter,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputPhase {
    #[default]
    Editing,
    /// The message is on the row above the input line.
    ReportingError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextRedraw {
    Patch(LinePatch),
    /// Show the current error. `is_new_row` is set when the prompt just left
    /// [`InputPhase::Editing`], and the error row has to be inserted.
    ShowError { is_new_row: bool },
}

pub type TextStep = EventLoopResult<TextRedraw, Value>;

#[derive(Debug, Clone)]
pub struct TextInputState {
    mode: InputMode,
    phase: InputPhase,
    text: EditableText,
    kind: TargetKind,
    validators: Vec<Validator>,
}

impl TextInputState {
    /// Boolean kinds get [`InputMode::YesNo`], everything else is edited as text.
    #[must_use]
    pub fn new(kind: TargetKind, config: &PromptConfig, validators: Vec<Validator>) -> Self {
        if kind.is_bool() {
            let default = config.default.as_ref().and_then(Value::as_bool);
            return Self {
                mode: InputMode::YesNo { default },
                phase: InputPhase::Editing,
                text: EditableText::default(),
                kind,
                validators,
            };
        }
        let default_text = config.default.as_ref().map(Value::to_edit_text);
        Self {
            mode: InputMode::Edit,
            phase: InputPhase::Editing,
            text: EditableText::new(default_text.as_deref(), config.initial_cursor),
            kind,
            validators,
        }
    }

    #[must_use]
    pub fn new_yes_no(default: Option<bool>) -> Self {
        Self {
            mode: InputMode::YesNo { default },
            phase: InputPhase::Editing,
            text: EditableText::default(),
            kind: TargetKind::Bool,
            validators: vec![],
        }
    }

    #[must_use]
    pub fn new_await_enter() -> Self {
        Self {
            mode: InputMode::AwaitEnter,
            phase: InputPhase::Editing,
            text: EditableText::default(),
            kind: TargetKind::Text,
            validators: vec![],
        }
    }

    #[must_use]
    pub fn mode(&self) -> InputMode { self.mode }

    #[must_use]
    pub fn phase(&self) -> &InputPhase { &self.phase }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            InputPhase::Editing => None,
            InputPhase::ReportingError(message) => Some(message),
        }
    }

    #[must_use]
    pub fn is_error_shown(&self) -> bool { self.error_message().is_some() }

    #[must_use]
    pub fn text(&self) -> &EditableText { &self.text }

    /// Printed between the label and the separator.
    #[must_use]
    pub fn hint(&self) -> &'static str {
        match self.mode {
            InputMode::Edit => "",
            InputMode::YesNo { default: Some(true) } => YES_NO_HINT_DEFAULT_YES,
            InputMode::YesNo { default: Some(false) } => YES_NO_HINT_DEFAULT_NO,
            InputMode::YesNo { default: None } => YES_NO_HINT,
            InputMode::AwaitEnter => ENTER_HINT,
        }
    }

    pub fn handle_key(&mut self, key: KeyPress) -> TextStep {
        match key {
            // Ctrl+C.
            KeyPress::Interrupt => return EventLoopResult::ExitWithInterrupt,
            // Esc.
            KeyPress::Esc => return EventLoopResult::ExitWithoutResult,
            _ => {}
        }
        match self.mode {
            InputMode::Edit => self.handle_edit_key(key),
            InputMode::YesNo { default } => self.handle_yes_no_key(key, default),
            InputMode::AwaitEnter => match key {
                KeyPress::Enter | KeyPress::EndOfInput => {
                    EventLoopResult::ExitWithResult(Value::Text(String::new()))
                }
                _ => EventLoopResult::Continue,
            },
        }
    }

    fn handle_edit_key(&mut self, key: KeyPress) -> TextStep {
        let patch = match key {
            // Enter.
            KeyPress::Enter | KeyPress::EndOfInput => return self.submit(),
            // Type.
            KeyPress::Char(it) => self.text.insert(it),
            // Delete.
            KeyPress::Backspace => self.text.delete_before(),
            KeyPress::Delete => self.text.delete_at(),
            // Move.
            KeyPress::Left => self.text.move_by(-1),
            KeyPress::Right => self.text.move_by(1),
            KeyPress::Home => self.text.move_to(0),
            KeyPress::End => self.text.move_to(self.text.len()),
            // Noop.
            _ => return EventLoopResult::Continue,
        };
        if patch.is_noop() {
            EventLoopResult::Continue
        } else {
            EventLoopResult::ContinueAndRerender(TextRedraw::Patch(patch))
        }
    }

    fn handle_yes_no_key(&mut self, key: KeyPress, default: Option<bool>) -> TextStep {
        let answer = match key {
            KeyPress::Enter | KeyPress::EndOfInput => default,
            KeyPress::Char(it) => parse_bool(it.encode_utf8(&mut [0; 4])),
            _ => return EventLoopResult::Continue,
        };
        match answer {
            Some(it) => self.finish(Value::Bool(it)),
            None => self.reject("invalid boolean".to_string()),
        }
    }

    /// Coerces the buffer and runs the validators.
    fn submit(&mut self) -> TextStep {
        match self.kind.coerce(&self.text.text()) {
            Ok(value) => self.finish(value),
            Err(message) => self.reject(message),
        }
    }

    fn finish(&mut self, value: Value) -> TextStep {
        match validate_all(&self.validators, &value) {
            Ok(()) => EventLoopResult::ExitWithResult(value),
            Err(message) => self.reject(message),
        }
    }

    fn reject(&mut self, message: String) -> TextStep {
        tracing::debug!(message = "input rejected", reason = %message);
        let is_new_row = !self.is_error_shown();
        self.phase = InputPhase::ReportingError(message);
        EventLoopResult::ContinueAndRerender(TextRedraw::ShowError { is_new_row })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{validators, IntWidth};

    fn run(state: &mut TextInputState, keys: &[KeyPress]) -> Vec<TextStep> {
        keys.iter().map(|it| state.handle_key(*it)).collect()
    }

    fn type_str(state: &mut TextInputState, text: &str) {
        for it in text.chars() {
            state.handle_key(KeyPress::Char(it));
        }
    }

    #[test]
    fn test_home_and_end_on_default_text() {
        let config = PromptConfig {
            default: Some(Value::Text("0123456789".to_string())),
            initial_cursor: Some(3),
        };
        let mut state = TextInputState::new(TargetKind::Text, &config, vec![]);
        assert_eq!(state.text().cursor(), 3);

        state.handle_key(KeyPress::End);
        assert_eq!(state.text().cursor(), 10);
        state.handle_key(KeyPress::Home);
        assert_eq!(state.text().cursor(), 0);

        // Already at the start.
        assert_eq!(state.handle_key(KeyPress::Home), EventLoopResult::Continue);
    }

    #[test]
    fn test_typing_returns_patches() {
        let mut state = TextInputState::new(TargetKind::Text, &PromptConfig::default(), vec![]);
        let steps = run(&mut state, &[KeyPress::Char('h'), KeyPress::Char('i')]);
        assert_eq!(
            steps[1],
            EventLoopResult::ContinueAndRerender(TextRedraw::Patch(LinePatch {
                move_before: 0,
                suffix: "i".to_string(),
                blank_count: 0,
                move_after: 0,
            }))
        );
        assert_eq!(state.handle_key(KeyPress::Backspace), EventLoopResult::ContinueAndRerender(
            TextRedraw::Patch(LinePatch {
                move_before: -1,
                suffix: String::new(),
                blank_count: 1,
                move_after: -1,
            })
        ));
        assert_eq!(
            state.handle_key(KeyPress::Enter),
            EventLoopResult::ExitWithResult(Value::Text("h".to_string()))
        );
    }

    #[test]
    fn test_rejection_cycle_keeps_text() {
        let mut state = TextInputState::new(
            TargetKind::Int(IntWidth::W8),
            &PromptConfig::default(),
            vec![validators::num_range(0.0, 10.0)],
        );
        type_str(&mut state, "1x");
        assert_eq!(
            state.handle_key(KeyPress::Enter),
            EventLoopResult::ContinueAndRerender(TextRedraw::ShowError { is_new_row: true })
        );
        assert_eq!(state.error_message(), Some("invalid integer"));
        assert_eq!(state.text().text(), "1x");

        // Still reporting while the user fixes the text.
        state.handle_key(KeyPress::Backspace);
        state.handle_key(KeyPress::Char('2'));
        assert!(state.is_error_shown());

        assert_eq!(
            state.handle_key(KeyPress::Enter),
            EventLoopResult::ContinueAndRerender(TextRedraw::ShowError { is_new_row: false })
        );
        assert_eq!(state.error_message(), Some("out of range [0,10]"));

        state.handle_key(KeyPress::Backspace);
        assert_eq!(
            state.handle_key(KeyPress::Enter),
            EventLoopResult::ExitWithResult(Value::Int(1))
        );
    }

    #[test]
    fn test_bool_kind_uses_yes_no_keys() {
        let config = PromptConfig::with_default(Value::Bool(true));
        let mut state = TextInputState::new(TargetKind::Bool, &config, vec![]);
        assert_eq!(state.mode(), InputMode::YesNo { default: Some(true) });
        assert_eq!(state.hint(), " [Y/n]");
        assert_eq!(
            state.handle_key(KeyPress::Enter),
            EventLoopResult::ExitWithResult(Value::Bool(true))
        );

        let answers = [
            ('y', true),
            ('T', true),
            ('1', true),
            ('N', false),
            ('f', false),
            ('0', false),
        ];
        for (key, expected) in answers {
            let mut state = TextInputState::new_yes_no(None);
            assert_eq!(
                state.handle_key(KeyPress::Char(key)),
                EventLoopResult::ExitWithResult(Value::Bool(expected))
            );
        }
    }

    #[test]
    fn test_yes_no_without_default_rejects_enter() {
        let mut state = TextInputState::new_yes_no(None);
        assert_eq!(state.hint(), " [y/n]");
        assert_eq!(
            state.handle_key(KeyPress::Enter),
            EventLoopResult::ContinueAndRerender(TextRedraw::ShowError { is_new_row: true })
        );
        assert_eq!(state.error_message(), Some("invalid boolean"));
        assert_eq!(state.handle_key(KeyPress::Left), EventLoopResult::Continue);
        assert_eq!(
            state.handle_key(KeyPress::Char('x')),
            EventLoopResult::ContinueAndRerender(TextRedraw::ShowError { is_new_row: false })
        );
        assert_eq!(
            state.handle_key(KeyPress::Char('n')),
            EventLoopResult::ExitWithResult(Value::Bool(false))
        );
    }

    #[test]
    fn test_await_enter_ignores_other_keys() {
        let mut state = TextInputState::new_await_enter();
        assert_eq!(state.hint(), " [enter]");
        let steps = run(&mut state, &[KeyPress::Char('a'), KeyPress::Up, KeyPress::EndOfInput]);
        assert_eq!(steps[0], EventLoopResult::Continue);
        assert_eq!(steps[1], EventLoopResult::Continue);
        assert_eq!(steps[2], EventLoopResult::ExitWithResult(Value::Text(String::new())));
    }

    #[test]
    fn test_interrupt_and_escape_in_every_mode() {
        for mut state in [
            TextInputState::new(TargetKind::Text, &PromptConfig::default(), vec![]),
            TextInputState::new_yes_no(Some(false)),
            TextInputState::new_await_enter(),
        ] {
            assert_eq!(state.handle_key(KeyPress::Interrupt), EventLoopResult::ExitWithInterrupt);
            assert_eq!(state.handle_key(KeyPress::Esc), EventLoopResult::ExitWithoutResult);
        }
    }
}
