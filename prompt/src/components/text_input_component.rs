// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Draws a [`TextInputState`]. While an error is reported it sits on its own row
//! directly above the input line:
//!
//! ```text
//! ERROR: invalid integer     <- only while reporting an error
//! Age: 4x▌                   <- the cursor rests in the edited text
//! ```

use std::io::{Result, Write};

use crossterm::{cursor::MoveToColumn,
                queue,
                style::{Print, PrintStyledContent},
                terminal::{Clear, ClearType}};

use crate::{queue_line_patch,
            queue_move_rows_down,
            queue_move_rows_up,
            FunctionComponent,
            InputMode,
            StyleSheet,
            TextInputState,
            TextRedraw,
            ERROR_PREFIX,
            LABEL_SEPARATOR};

#[derive(Debug)]
pub struct TextInputComponent<W: Write> {
    pub write: W,
    pub style: StyleSheet,
    pub label: String,
}

impl<W: Write> TextInputComponent<W> {
    fn ready_column(&self, state: &TextInputState) -> u16 {
        let column = self.label.chars().count()
            + state.hint().chars().count()
            + LABEL_SEPARATOR.chars().count()
            + state.text().cursor();
        u16::try_from(column).unwrap_or(u16::MAX)
    }

    fn queue_input_row(&mut self, state: &TextInputState) -> Result<()> {
        let text = match state.mode() {
            InputMode::Edit => state.text().text(),
            InputMode::YesNo { .. } | InputMode::AwaitEnter => String::new(),
        };
        queue!(
            self.write,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            PrintStyledContent(self.style.label_style.apply(&self.label)),
            PrintStyledContent(self.style.hint_style.apply(state.hint())),
            Print(LABEL_SEPARATOR),
            Print(text),
        )?;
        let ready_column = self.ready_column(state);
        queue!(self.write, MoveToColumn(ready_column))
    }

    /// Overwrites the row the cursor is on with the current error.
    fn queue_error_row(&mut self, state: &TextInputState) -> Result<()> {
        let message = format!("{ERROR_PREFIX}{}", state.error_message().unwrap_or_default());
        queue!(
            self.write,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            PrintStyledContent(self.style.error_style.apply(message)),
        )
    }
}

impl<W: Write> FunctionComponent<W, TextInputState> for TextInputComponent<W> {
    type Redraw = TextRedraw;

    fn get_write(&mut self) -> &mut W { &mut self.write }

    fn calculate_viewport_height(&self, state: &TextInputState) -> usize {
        usize::from(state.is_error_shown()) + 1
    }

    fn calculate_rows_above_cursor(&self, state: &TextInputState) -> usize {
        usize::from(state.is_error_shown())
    }

    fn is_cursor_hidden(&self, state: &TextInputState) -> bool {
        state.mode() == InputMode::AwaitEnter
    }

    /// Starts on the top working row.
    fn render(&mut self, state: &TextInputState) -> Result<()> {
        if state.is_error_shown() {
            self.queue_error_row(state)?;
            queue_move_rows_down(&mut self.write, 1)?;
        }
        self.queue_input_row(state)?;
        self.write.flush()
    }

    fn render_redraw(&mut self, state: &TextInputState, redraw: TextRedraw) -> Result<()> {
        match redraw {
            TextRedraw::Patch(patch) => queue_line_patch(&mut self.write, &patch)?,
            TextRedraw::ShowError { is_new_row: true } => {
                // The input line becomes the error row, and the input moves one row
                // down, scrolling the terminal if it has to.
                self.queue_error_row(state)?;
                queue!(self.write, Print("\n"))?;
                self.queue_input_row(state)?;
            }
            TextRedraw::ShowError { is_new_row: false } => {
                queue_move_rows_up(&mut self.write, 1)?;
                self.queue_error_row(state)?;
                queue_move_rows_down(&mut self.write, 1)?;
                let ready_column = self.ready_column(state);
                queue!(self.write, MoveToColumn(ready_column))?;
            }
        }
        self.write.flush()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{test_utils::StdoutMock,
                EventLoopResult,
                IntWidth,
                KeyPress,
                PromptConfig,
                TargetKind};

    fn component(stdout_mock: &StdoutMock, label: &str) -> TextInputComponent<StdoutMock> {
        TextInputComponent {
            write: stdout_mock.clone(),
            style: StyleSheet::plain(),
            label: label.to_string(),
        }
    }

    fn redraw_for(state: &mut TextInputState, key: KeyPress) -> TextRedraw {
        match state.handle_key(key) {
            EventLoopResult::ContinueAndRerender(redraw) => redraw,
            other => panic!("expected a redraw, got {other:?}"),
        }
    }

    #[test]
    fn test_render_places_cursor_in_text() {
        let stdout_mock = StdoutMock::default();
        let state = TextInputState::new(
            TargetKind::Text,
            &PromptConfig {
                default: Some("hello".into()),
                initial_cursor: Some(2),
            },
            vec![],
        );
        let mut component = component(&stdout_mock, "Name");
        component.render(&state).unwrap();

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string_strip_ansi(), "Name: hello");
        // "Name: " is 6 columns, plus a cursor of 2, is column 9 (1 based).
        assert!(stdout_mock.get_copy_of_buffer_as_string().ends_with("\x1b[9G"));
    }

    #[test]
    fn test_typing_only_prints_the_suffix() {
        let stdout_mock = StdoutMock::default();
        let mut state = TextInputState::new(
            TargetKind::Text,
            &PromptConfig {
                default: Some("held".into()),
                initial_cursor: Some(3),
            },
            vec![],
        );
        let mut component = component(&stdout_mock, "Word");
        component.render(&state).unwrap();
        stdout_mock.clear();

        let redraw = redraw_for(&mut state, KeyPress::Char('l'));
        component.render_redraw(&state, redraw).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "ld\x1b[1D");
    }

    #[test]
    fn test_error_row_is_inserted_then_rewritten() {
        let stdout_mock = StdoutMock::default();
        let mut state = TextInputState::new(
            TargetKind::Int(IntWidth::W32),
            &PromptConfig::default(),
            vec![],
        );
        let mut component = component(&stdout_mock, "Age");
        component.render(&state).unwrap();
        assert_eq!(component.calculate_rows_above_cursor(&state), 0);

        state.handle_key(KeyPress::Char('x'));
        stdout_mock.clear();
        let redraw = redraw_for(&mut state, KeyPress::Enter);
        component.render_redraw(&state, redraw).unwrap();
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string_strip_ansi(),
            "ERROR: invalid integer\nAge: x"
        );
        assert_eq!(component.calculate_rows_above_cursor(&state), 1);
        assert_eq!(component.calculate_viewport_height(&state), 2);

        stdout_mock.clear();
        state.handle_key(KeyPress::Backspace);
        let redraw = redraw_for(&mut state, KeyPress::Enter);
        component.render_redraw(&state, redraw).unwrap();
        let output = stdout_mock.get_copy_of_buffer_as_string();
        assert!(output.starts_with("\x1b[1A"));
        assert!(!output.contains('\n'));
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string_strip_ansi(),
            "ERROR: invalid integer"
        );
    }

    #[test]
    fn test_clear_viewport_removes_error_row() {
        let stdout_mock = StdoutMock::default();
        let mut state = TextInputState::new_yes_no(None);
        let mut component = component(&stdout_mock, "Continue");
        state.handle_key(KeyPress::Enter);
        stdout_mock.clear();

        component.clear_viewport(&state).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\x1b[1G\x1b[1A\x1b[J");
    }

    #[test]
    fn test_yes_no_does_not_echo() {
        let stdout_mock = StdoutMock::default();
        let state = TextInputState::new_yes_no(Some(false));
        let mut component = component(&stdout_mock, "Delete");
        component.render(&state).unwrap();
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string_strip_ansi(),
            "Delete [y/N]: "
        );
    }
}
