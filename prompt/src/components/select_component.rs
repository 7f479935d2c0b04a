// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Draws a [`ListState`]:
//!
//! ```text
//! Color: bl▌                 <- prompt row, the cursor rests in the query
//!  › Blue                    <- window row 0
//!    Purple                  <- window row 1
//!                            <- allocated rows that the filter emptied are blank
//! ```

use std::io::{Result, Write};

use crossterm::{cursor::{MoveToColumn, MoveToNextLine, MoveToPreviousLine},
                queue,
                style::{Print, PrintStyledContent},
                terminal::{Clear, ClearType}};

use crate::{queue_line_patch,
            queue_move_rows_down,
            queue_move_rows_up,
            FunctionComponent,
            ListMode,
            ListRedraw,
            ListState,
            RowRedraw,
            SelectionMode,
            StyleSheet,
            CHECKED,
            CHECKLIST_HINT,
            ELLIPSIS,
            IS_FOCUSED,
            IS_NOT_FOCUSED,
            LABEL_SEPARATOR,
            NOT_CHECKED,
            NO_OPTIONS_FOUND};

#[derive(Debug)]
pub struct SelectComponent<W: Write> {
    pub write: W,
    pub style: StyleSheet,
    pub label: String,
    /// Rows are clipped to this many columns.
    pub max_width: usize,
}

impl<W: Write> SelectComponent<W> {
    fn hint(state: &ListState) -> &'static str {
        match state.selection_mode() {
            SelectionMode::Single => "",
            SelectionMode::Multiple => CHECKLIST_HINT,
        }
    }

    /// Column of the ready position on the prompt row.
    fn ready_column(&self, state: &ListState) -> u16 {
        let column = self.label.chars().count()
            + Self::hint(state).chars().count()
            + LABEL_SEPARATOR.chars().count()
            + state.query().map_or(0, crate::EditableText::cursor);
        u16::try_from(column).unwrap_or(u16::MAX)
    }

    fn queue_prompt_row(&mut self, state: &ListState) -> Result<()> {
        let label_style = self.style.label_style;
        let hint_style = self.style.hint_style;
        let query = state.query().map(crate::EditableText::text).unwrap_or_default();
        queue!(
            self.write,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            PrintStyledContent(label_style.apply(&self.label)),
            PrintStyledContent(hint_style.apply(Self::hint(state))),
            Print(LABEL_SEPARATOR),
            Print(query),
        )
    }

    /// Clears the row the cursor is on and draws window row `row` there.
    fn queue_window_row(&mut self, state: &ListState, row: usize) -> Result<()> {
        queue!(self.write, MoveToColumn(0), Clear(ClearType::CurrentLine))?;

        if let Some(visible_row) = state.visible_row(row) {
            let focus_marker = if visible_row.is_focused {
                IS_FOCUSED
            } else {
                IS_NOT_FOCUSED
            };
            let check_marker = match state.selection_mode() {
                SelectionMode::Single => "",
                SelectionMode::Multiple if visible_row.is_checked => CHECKED,
                SelectionMode::Multiple => NOT_CHECKED,
            };
            let line = clip_string_to_width_with_ellipsis(
                format!("{focus_marker}{check_marker}{}", visible_row.label),
                self.max_width,
            );
            let data_style = if visible_row.is_focused {
                self.style.focused_style
            } else {
                self.style.normal_style
            };
            queue!(self.write, PrintStyledContent(data_style.apply(line)))?;
        } else if row == 0 && state.mode() == ListMode::Empty {
            let placeholder = format!("{IS_NOT_FOCUSED}{NO_OPTIONS_FOUND}");
            queue!(
                self.write,
                PrintStyledContent(self.style.placeholder_style.apply(placeholder))
            )?;
        }
        Ok(())
    }

    /// Repaints every allocated row below the prompt row.
    fn queue_window(&mut self, state: &ListState) -> Result<()> {
        let allocated_rows = state.allocated_rows();
        for row in 0..allocated_rows {
            queue!(self.write, MoveToNextLine(1))?;
            self.queue_window_row(state, row)?;
        }
        if allocated_rows > 0 {
            queue!(
                self.write,
                MoveToPreviousLine(u16::try_from(allocated_rows).unwrap_or(u16::MAX))
            )?;
        }
        Ok(())
    }
}

impl<W: Write> FunctionComponent<W, ListState> for SelectComponent<W> {
    type Redraw = ListRedraw;

    fn get_write(&mut self) -> &mut W { &mut self.write }

    /// The prompt row plus the allocated rows, which don't change when the filter
    /// shrinks the window.
    fn calculate_viewport_height(&self, state: &ListState) -> usize {
        state.allocated_rows() + 1
    }

    fn is_cursor_hidden(&self, state: &ListState) -> bool { !state.is_searchable() }

    fn render(&mut self, state: &ListState) -> Result<()> {
        self.queue_prompt_row(state)?;
        self.queue_window(state)?;
        let ready_column = self.ready_column(state);
        queue!(self.write, MoveToColumn(ready_column))?;
        self.write.flush()
    }

    fn render_redraw(&mut self, state: &ListState, redraw: ListRedraw) -> Result<()> {
        if let Some(patch) = &redraw.query {
            queue_line_patch(&mut self.write, patch)?;
        }

        match redraw.rows {
            RowRedraw::Nothing => {}
            RowRedraw::Rows(rows) => {
                for row in rows {
                    queue_move_rows_down(&mut self.write, row + 1)?;
                    self.queue_window_row(state, row)?;
                    queue_move_rows_up(&mut self.write, row + 1)?;
                }
            }
            RowRedraw::Window => self.queue_window(state)?,
        }

        let ready_column = self.ready_column(state);
        queue!(self.write, MoveToColumn(ready_column))?;
        self.write.flush()
    }
}

/// Clips by code points, one code point per column.
#[must_use]
pub fn clip_string_to_width_with_ellipsis(line: String, viewport_width: usize) -> String {
    let ellipsis_width = ELLIPSIS.chars().count();
    if line.chars().count() <= viewport_width || viewport_width <= ellipsis_width {
        return line;
    }
    let clipped: String = line.chars().take(viewport_width - ellipsis_width).collect();
    format!("{clipped}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{test_utils::StdoutMock, EventLoopResult, KeyPress, ListConfig};

    const CLEAR_LINE: &str = "\x1b[2K";

    fn colors() -> Vec<String> {
        ["Red", "Orange", "Green", "Yellow", "Blue", "Purple"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn component(stdout_mock: &StdoutMock, label: &str) -> SelectComponent<StdoutMock> {
        SelectComponent {
            write: stdout_mock.clone(),
            style: StyleSheet::plain(),
            label: label.to_string(),
            max_width: 80,
        }
    }

    fn redraw_for(state: &mut ListState, key: KeyPress) -> ListRedraw {
        match state.handle_key(key) {
            EventLoopResult::ContinueAndRerender(redraw) => redraw,
            other => panic!("expected a redraw, got {other:?}"),
        }
    }

    #[test]
    fn test_clip_string_to_width_with_ellipsis() {
        let line = "This is a long line that needs to be clipped".to_string();
        assert_eq!(clip_string_to_width_with_ellipsis(line, 20), "This is a long li...");

        let short_line = "This is a short line".to_string();
        assert_eq!(
            clip_string_to_width_with_ellipsis(short_line, 20),
            "This is a short line"
        );

        assert_eq!(clip_string_to_width_with_ellipsis("ünïcödé".into(), 6), "ünï...");
    }

    #[test]
    fn test_render_full_window() {
        let stdout_mock = StdoutMock::default();
        let state = ListState::new(colors(), 3, SelectionMode::Single, 24, &ListConfig {
            max_visible_lines: 4,
            scroll_margin: 1,
            ..ListConfig::default()
        });
        let mut component = component(&stdout_mock, "Color");
        component.render(&state).unwrap();

        let output = stdout_mock.get_copy_of_buffer_as_string();
        // Prompt row plus 4 window rows.
        assert_eq!(output.matches(CLEAR_LINE).count(), 5);
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string_strip_ansi(),
            "Color:    Green › Yellow   Blue   Purple"
        );
    }

    #[test]
    fn test_selection_move_repaints_two_rows() {
        let stdout_mock = StdoutMock::default();
        let mut state =
            ListState::new(colors(), 0, SelectionMode::Single, 24, &ListConfig::default());
        let mut component = component(&stdout_mock, "Color");
        component.render(&state).unwrap();
        stdout_mock.clear();

        let redraw = redraw_for(&mut state, KeyPress::Down);
        component.render_redraw(&state, redraw).unwrap();

        let output = stdout_mock.get_copy_of_buffer_as_string();
        assert_eq!(output.matches(CLEAR_LINE).count(), 2);
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string_strip_ansi(),
            "   Red › Orange"
        );
        // Row 0 is one down, row 1 is two down, and the cursor comes back up each time.
        assert!(output.starts_with("\x1b[1B"));
        assert!(output.contains("\x1b[1A\x1b[2B"));
        assert!(output.ends_with("\x1b[2A\x1b[8G"));
    }

    #[test]
    fn test_checklist_rows_and_hint() {
        let stdout_mock = StdoutMock::default();
        let mut state =
            ListState::new(colors(), 0, SelectionMode::Multiple, 24, &ListConfig::default())
                .with_checked(&[1]);
        let mut component = component(&stdout_mock, "Colors");
        component.render(&state).unwrap();
        let output = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
        assert!(output.starts_with("Colors (space selects): "));
        assert!(output.contains(" › [ ] Red"));
        assert!(output.contains("   [×] Orange"));

        stdout_mock.clear();
        let redraw = redraw_for(&mut state, KeyPress::Char(' '));
        component.render_redraw(&state, redraw).unwrap();
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string().matches(CLEAR_LINE).count(),
            1
        );
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string_strip_ansi(),
            " › [×] Red"
        );
    }

    #[test]
    fn test_query_edit_patches_prompt_row_and_repaints_window() {
        let stdout_mock = StdoutMock::default();
        let mut state = ListState::new(colors(), 0, SelectionMode::Single, 24, &ListConfig {
            max_visible_lines: 3,
            ..ListConfig::default()
        });
        let mut component = component(&stdout_mock, "Color");
        component.render(&state).unwrap();
        stdout_mock.clear();

        let redraw = redraw_for(&mut state, KeyPress::Char('z'));
        component.render_redraw(&state, redraw).unwrap();
        // The query patch, then all 3 allocated rows: a placeholder and two blanks.
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string_strip_ansi(),
            format!("z   {NO_OPTIONS_FOUND}")
        );
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string().matches(CLEAR_LINE).count(),
            3
        );
    }

    #[test]
    fn test_cursor_hidden_only_without_search() {
        let stdout_mock = StdoutMock::default();
        let component = component(&stdout_mock, "Color");
        let state =
            ListState::new(colors(), 0, SelectionMode::Single, 24, &ListConfig::default());
        assert!(component.is_cursor_hidden(&state));
        let searchable = ListState::new(colors(), 0, SelectionMode::Single, 24, &ListConfig {
            search_threshold: 2,
            ..ListConfig::default()
        });
        assert!(!component.is_cursor_hidden(&searchable));
    }
}
