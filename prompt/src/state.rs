// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The state machine behind [`crate::select`] and [`crate::checklist`].
//!
//! ```text
//!            type / backspace                 query matches nothing
//!   Normal ───────────────────▶ Searching ───────────────────────────▶ Empty
//!     ▲   ◀─────────────────── (query cleared)        ◀── query edited ──┘
//!     │
//!     └─ Enter / select key ─▶ Accepted    Ctrl+C ─▶ Cancelled    Esc ─▶ Escaped
//! ```
//!
//! Every transition returns a [`ListRedraw`] so the renderer can repaint as little as
//! possible: two rows when the selection moves inside the window, one row when a
//! checkbox toggles, and the whole window when it scrolls or the filter changes.

use crate::{BoundaryPolicy,
            EditableText,
            EventLoopResult,
            KeyPress,
            LinePatch,
            ListConfig,
            PromptError,
            SelectionMode,
            Viewport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption<T> {
    pub label: String,
    pub value: T,
}

impl<T> SelectOption<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl From<&str> for SelectOption<String> {
    fn from(label: &str) -> Self { SelectOption::new(label, label.to_string()) }
}

/// An ordered, non-empty set of options with at most `max_option_count` elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet<T> {
    options: Vec<SelectOption<T>>,
}

impl<T> OptionSet<T> {
    /// # Errors
    ///
    /// Returns [`PromptError::NoOptions`] for an empty list and
    /// [`PromptError::TooManyOptions`] when there are more than `max_option_count`.
    pub fn try_new(
        options: Vec<SelectOption<T>>,
        max_option_count: usize,
    ) -> Result<Self, PromptError> {
        if options.is_empty() {
            return Err(PromptError::NoOptions);
        }
        if options.len() > max_option_count {
            return Err(PromptError::TooManyOptions {
                count: options.len(),
                max: max_option_count,
            });
        }
        Ok(Self { options })
    }

    #[must_use]
    pub fn len(&self) -> usize { self.options.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.options.is_empty() }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SelectOption<T>> { self.options.get(index) }

    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.options.iter().map(|it| it.label.clone()).collect()
    }

    /// Moves the values at `indices` out, in the order given. Unknown and repeated
    /// indices are skipped.
    #[must_use]
    pub fn take_values(self, indices: &[usize]) -> Vec<T> {
        let mut slots: Vec<Option<T>> =
            self.options.into_iter().map(|it| Some(it.value)).collect();
        indices
            .iter()
            .filter_map(|&index| slots.get_mut(index).and_then(Option::take))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Normal,
    /// The query is not empty.
    Searching,
    /// Nothing matches the query.
    Empty,
}

/// Which list rows to repaint. Row numbers are relative to the top of the window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RowRedraw {
    #[default]
    Nothing,
    Rows(Vec<usize>),
    Window,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRedraw {
    /// Patch for the query on the prompt line.
    pub query: Option<LinePatch>,
    pub rows: RowRedraw,
}

impl ListRedraw {
    fn rows(rows: RowRedraw) -> Self {
        Self {
            query: None,
            rows,
        }
    }
}

/// A visible row, as handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow<'a> {
    pub label: &'a str,
    pub is_focused: bool,
    /// Always `false` in [`SelectionMode::Single`].
    pub is_checked: bool,
}

pub type ListStep = EventLoopResult<ListRedraw, Vec<usize>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    labels: Vec<String>,
    lowercase_labels: Vec<String>,
    selection_mode: SelectionMode,
    /// `Some` when search is enabled.
    query: Option<EditableText>,
    /// Indices into `labels` that match the query, in their original order.
    filtered: Vec<usize>,
    /// Index into `filtered`. Fixed at 0 while `filtered` is empty.
    selection: usize,
    viewport: Viewport,
    /// One flag per label in [`SelectionMode::Multiple`], empty otherwise.
    checked: Vec<bool>,
    boundary_policy: BoundaryPolicy,
    select_key: Option<char>,
    /// Rows under the prompt line. This doesn't change while the prompt runs, even when
    /// the filter shrinks the window.
    allocated_rows: usize,
}

impl ListState {
    /// `initial_selection` is clipped into the list.
    #[must_use]
    pub fn new(
        labels: Vec<String>,
        initial_selection: usize,
        selection_mode: SelectionMode,
        terminal_rows: usize,
        config: &ListConfig,
    ) -> Self {
        let count = labels.len();
        let mut viewport =
            Viewport::new(config.max_visible_lines, terminal_rows, config.scroll_margin);
        let is_searchable = count > viewport.max_height || count > config.search_threshold;
        let selection = initial_selection.min(count.saturating_sub(1));
        viewport.reset(selection, count);

        let select_key = match selection_mode {
            SelectionMode::Single => config.select_key,
            SelectionMode::Multiple => Some(' '),
        };
        let checked = match selection_mode {
            SelectionMode::Single => vec![],
            SelectionMode::Multiple => vec![false; count],
        };

        Self {
            lowercase_labels: labels.iter().map(|it| it.to_lowercase()).collect(),
            allocated_rows: viewport.max_height.min(count),
            labels,
            selection_mode,
            query: is_searchable.then(EditableText::default),
            filtered: (0..count).collect(),
            selection,
            viewport,
            checked,
            boundary_policy: config.boundary_policy,
            select_key,
        }
    }

    /// Pre-checks options by their original index. Out of range indices are ignored.
    #[must_use]
    pub fn with_checked(mut self, indices: &[usize]) -> Self {
        for &index in indices {
            if let Some(flag) = self.checked.get_mut(index) {
                *flag = true;
            }
        }
        self
    }

    #[must_use]
    pub fn mode(&self) -> ListMode {
        if self.filtered.is_empty() {
            ListMode::Empty
        } else if self.query.as_ref().is_some_and(|it| !it.is_empty()) {
            ListMode::Searching
        } else {
            ListMode::Normal
        }
    }

    #[must_use]
    pub fn selection_mode(&self) -> SelectionMode { self.selection_mode }

    #[must_use]
    pub fn is_searchable(&self) -> bool { self.query.is_some() }

    #[must_use]
    pub fn query(&self) -> Option<&EditableText> { self.query.as_ref() }

    #[must_use]
    pub fn filtered(&self) -> &[usize] { &self.filtered }

    #[must_use]
    pub fn selection(&self) -> usize { self.selection }

    #[must_use]
    pub fn viewport(&self) -> &Viewport { &self.viewport }

    #[must_use]
    pub fn allocated_rows(&self) -> usize { self.allocated_rows }

    #[must_use]
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// The original index of the option under the cursor.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> { self.filtered.get(self.selection).copied() }

    /// Original indices of the checked options, in their original order.
    #[must_use]
    pub fn checked_indices(&self) -> Vec<usize> {
        self.checked
            .iter()
            .enumerate()
            .filter_map(|(index, is_checked)| is_checked.then_some(index))
            .collect()
    }

    /// The visible row `row` of the window, if the window has that many rows.
    #[must_use]
    pub fn visible_row(&self, row: usize) -> Option<VisibleRow<'_>> {
        if row >= self.viewport.height {
            return None;
        }
        let filtered_index = self.viewport.start + row;
        let index = *self.filtered.get(filtered_index)?;
        Some(VisibleRow {
            label: &self.labels[index],
            is_focused: filtered_index == self.selection,
            is_checked: self.checked.get(index).copied().unwrap_or(false),
        })
    }

    pub fn handle_key(&mut self, key: KeyPress) -> ListStep {
        let is_searchable = self.is_searchable();
        let step = match key {
            // Ctrl+C.
            KeyPress::Interrupt => EventLoopResult::ExitWithInterrupt,

            // Esc. The decoder only reports it when nothing else is buffered.
            KeyPress::Esc => EventLoopResult::ExitWithoutResult,

            // Enter.
            KeyPress::Enter | KeyPress::EndOfInput => self.accept(),

            // Space on multi-select, or the configured select key.
            KeyPress::Char(it) if Some(it) == self.select_key => match self.selection_mode {
                SelectionMode::Single => self.accept(),
                SelectionMode::Multiple => self.toggle_checked(),
            },

            // Up.
            KeyPress::Up | KeyPress::BackTab => self.step_selection(-1),
            KeyPress::Char('k' | 'w') if !is_searchable => self.step_selection(-1),

            // Down.
            KeyPress::Down | KeyPress::Tab => self.step_selection(1),
            KeyPress::Char('j' | 's') if !is_searchable => self.step_selection(1),

            // Page up / down.
            KeyPress::PageUp => {
                self.move_selection_to(self.selection.saturating_sub(self.viewport.height))
            }
            KeyPress::PageDown => self.move_selection_to(
                (self.selection + self.viewport.height)
                    .min(self.filtered.len().saturating_sub(1)),
            ),

            // Home / End.
            KeyPress::Home => self.move_selection_to(0),
            KeyPress::End => self.move_selection_to(self.filtered.len().saturating_sub(1)),

            // Query editing.
            KeyPress::Char(it) if is_searchable => {
                self.edit_query(|query| query.insert(it))
            }
            KeyPress::Backspace if is_searchable => {
                self.edit_query(EditableText::delete_before)
            }
            KeyPress::Delete if is_searchable => self.edit_query(EditableText::delete_at),
            KeyPress::Left if is_searchable => self.move_query_cursor(-1),
            KeyPress::Right if is_searchable => self.move_query_cursor(1),

            // Noop.
            _ => EventLoopResult::Continue,
        };
        tracing::debug!(
            message = "list key handled",
            ?key,
            selection = self.selection,
            start = self.viewport.start,
            mode = ?self.mode()
        );
        step
    }

    /// Rebuilds the filtered index from the query. The selection follows the selected
    /// option if it still matches, otherwise it goes back to the top.
    pub fn refilter(&mut self) {
        let previously_selected = self.selected_index();
        let query = self
            .query
            .as_ref()
            .map(|it| it.text().to_lowercase())
            .unwrap_or_default();
        self.filtered = filter_indices(&self.lowercase_labels, &query);
        self.selection = previously_selected
            .and_then(|index| self.filtered.iter().position(|&it| it == index))
            .unwrap_or(0);
        self.viewport.reset(self.selection, self.filtered.len());
        tracing::debug!(
            message = "filter applied",
            query = %query,
            match_count = self.filtered.len(),
            selection = self.selection
        );
    }

    fn accept(&self) -> ListStep {
        match self.selection_mode {
            SelectionMode::Single => match self.selected_index() {
                Some(index) => EventLoopResult::ExitWithResult(vec![index]),
                // Nothing to pick in the empty state.
                None => EventLoopResult::Continue,
            },
            SelectionMode::Multiple => EventLoopResult::ExitWithResult(self.checked_indices()),
        }
    }

    fn toggle_checked(&mut self) -> ListStep {
        let Some(index) = self.selected_index() else {
            return EventLoopResult::Continue;
        };
        self.checked[index] = !self.checked[index];
        let row = self.selection - self.viewport.start;
        EventLoopResult::ContinueAndRerender(ListRedraw::rows(RowRedraw::Rows(vec![row])))
    }

    fn step_selection(&mut self, delta: isize) -> ListStep {
        let count = self.filtered.len();
        if count == 0 {
            return EventLoopResult::Continue;
        }
        let target = match self.boundary_policy {
            BoundaryPolicy::Clamp => self.selection.saturating_add_signed(delta).min(count - 1),
            BoundaryPolicy::Wrap => wrap_index(self.selection, delta, count),
        };
        self.move_selection_to(target)
    }

    fn move_selection_to(&mut self, target: usize) -> ListStep {
        let count = self.filtered.len();
        if count == 0 || target == self.selection {
            return EventLoopResult::Continue;
        }
        let old_selection = self.selection;
        self.selection = target;
        let did_scroll = self.viewport.follow(old_selection, target, count);
        let rows = if did_scroll {
            RowRedraw::Window
        } else {
            RowRedraw::Rows(vec![
                old_selection - self.viewport.start,
                target - self.viewport.start,
            ])
        };
        EventLoopResult::ContinueAndRerender(ListRedraw::rows(rows))
    }

    fn edit_query(&mut self, edit: impl FnOnce(&mut EditableText) -> LinePatch) -> ListStep {
        let Some(query) = self.query.as_mut() else {
            return EventLoopResult::Continue;
        };
        let patch = edit(query);
        if patch.is_noop() {
            return EventLoopResult::Continue;
        }
        self.refilter();
        EventLoopResult::ContinueAndRerender(ListRedraw {
            query: Some(patch),
            rows: RowRedraw::Window,
        })
    }

    fn move_query_cursor(&mut self, delta: isize) -> ListStep {
        let Some(query) = self.query.as_mut() else {
            return EventLoopResult::Continue;
        };
        let patch = query.move_by(delta);
        if patch.is_noop() {
            return EventLoopResult::Continue;
        }
        EventLoopResult::ContinueAndRerender(ListRedraw {
            query: Some(patch),
            rows: RowRedraw::Nothing,
        })
    }
}

#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn wrap_index(index: usize, delta: isize, count: usize) -> usize {
    (index as isize + delta).rem_euclid(count as isize) as usize
}

/// Indices of the labels that contain `lowercase_query`, in their original order. An
/// empty query matches everything.
#[must_use]
pub fn filter_indices(lowercase_labels: &[String], lowercase_query: &str) -> Vec<usize> {
    lowercase_labels
        .iter()
        .enumerate()
        .filter(|(_, label)| label.contains(lowercase_query))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn colors() -> Vec<String> {
        ["Red", "Orange", "Green", "Yellow", "Blue", "Purple"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn config(max_visible_lines: usize, scroll_margin: usize) -> ListConfig {
        ListConfig {
            max_visible_lines,
            scroll_margin,
            ..ListConfig::default()
        }
    }

    fn type_query(state: &mut ListState, text: &str) {
        for it in text.chars() {
            state.handle_key(KeyPress::Char(it));
        }
    }

    fn visible_labels(state: &ListState) -> Vec<String> {
        (0..state.viewport().height)
            .filter_map(|row| state.visible_row(row))
            .map(|it| it.label.to_string())
            .collect()
    }

    #[test]
    fn test_option_set_limits() {
        assert!(matches!(
            OptionSet::<String>::try_new(vec![], 256),
            Err(PromptError::NoOptions)
        ));
        let options: Vec<SelectOption<String>> =
            ["a", "b", "c"].into_iter().map(SelectOption::from).collect();
        assert!(matches!(
            OptionSet::try_new(options.clone(), 2),
            Err(PromptError::TooManyOptions { count: 3, max: 2 })
        ));
        assert_eq!(OptionSet::try_new(options, 3).unwrap().len(), 3);
    }

    #[test]
    fn test_take_values_moves_out_in_index_order() {
        let options = vec![
            SelectOption::new("one", 1),
            SelectOption::new("two", 2),
            SelectOption::new("three", 3),
        ];
        let option_set = OptionSet::try_new(options, 256).unwrap();
        assert_eq!(option_set.take_values(&[2, 0, 2, 9]), vec![3, 1]);
    }

    #[test]
    fn test_initial_window_centers_selection() {
        let state = ListState::new(colors(), 3, SelectionMode::Single, 24, &config(4, 1));
        assert_eq!(state.viewport().start, 2);
        assert_eq!(visible_labels(&state), vec!["Green", "Yellow", "Blue", "Purple"]);
        assert_eq!(state.selected_index(), Some(3));
        // 6 options don't fit in 4 rows.
        assert!(state.is_searchable());
    }

    #[test]
    fn test_initial_selection_is_clipped() {
        let state = ListState::new(colors(), 99, SelectionMode::Single, 24, &config(7, 2));
        assert_eq!(state.selected_index(), Some(5));
        assert!(!state.is_searchable());
    }

    #[test]
    fn test_typing_filters_and_resets_selection() {
        let mut state = ListState::new(colors(), 3, SelectionMode::Single, 24, &config(4, 1));
        type_query(&mut state, "l");
        // Yellow still matches, so the selection follows it.
        assert_eq!(state.filtered(), &[3, 4, 5]);
        assert_eq!(state.selected_index(), Some(3));
        assert_eq!(state.mode(), ListMode::Searching);

        type_query(&mut state, "u");
        assert_eq!(state.filtered(), &[4]);
        assert_eq!(state.selection(), 0);
        assert_eq!(state.selected_index(), Some(4));
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let lowercase: Vec<String> = colors().iter().map(|it| it.to_lowercase()).collect();
        assert_eq!(filter_indices(&lowercase, "e"), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(filter_indices(&lowercase, "re"), vec![0, 2]);
        assert_eq!(filter_indices(&lowercase, ""), vec![0, 1, 2, 3, 4, 5]);
        let mut state = ListState::new(colors(), 0, SelectionMode::Single, 24, &config(4, 1));
        type_query(&mut state, "GREEN");
        assert_eq!(state.filtered(), &[2]);
    }

    #[test]
    fn test_refilter_is_idempotent() {
        let mut state = ListState::new(colors(), 3, SelectionMode::Single, 24, &config(4, 1));
        type_query(&mut state, "e");
        state.handle_key(KeyPress::Down);
        let before = state.clone();
        state.refilter();
        assert_eq!(state, before);
    }

    #[test]
    fn test_empty_state_keeps_query_and_recovers() {
        let mut state = ListState::new(colors(), 0, SelectionMode::Single, 24, &config(4, 1));
        type_query(&mut state, "zz");
        assert_eq!(state.mode(), ListMode::Empty);
        assert_eq!(state.selection(), 0);
        assert_eq!(state.query().unwrap().text(), "zz");
        assert_eq!(state.handle_key(KeyPress::Down), EventLoopResult::Continue);
        assert_eq!(state.handle_key(KeyPress::Enter), EventLoopResult::Continue);

        state.handle_key(KeyPress::Backspace);
        state.handle_key(KeyPress::Backspace);
        assert_eq!(state.mode(), ListMode::Normal);
        assert_eq!(state.filtered().len(), 6);
    }

    #[test]
    fn test_move_inside_window_redraws_two_rows() {
        let mut state = ListState::new(colors(), 0, SelectionMode::Single, 24, &config(7, 2));
        assert_eq!(
            state.handle_key(KeyPress::Down),
            EventLoopResult::ContinueAndRerender(ListRedraw::rows(RowRedraw::Rows(vec![0, 1])))
        );
    }

    #[test]
    fn test_scrolling_redraws_window() {
        let labels: Vec<String> = (0..20).map(|it| format!("item {it}")).collect();
        let mut state = ListState::new(labels, 0, SelectionMode::Single, 24, &config(5, 1));
        for _ in 0..3 {
            assert!(matches!(
                state.handle_key(KeyPress::Down),
                EventLoopResult::ContinueAndRerender(ListRedraw {
                    rows: RowRedraw::Rows(_),
                    ..
                })
            ));
        }
        assert_eq!(
            state.handle_key(KeyPress::Down),
            EventLoopResult::ContinueAndRerender(ListRedraw::rows(RowRedraw::Window))
        );
        assert_eq!(state.viewport().start, 1);
    }

    #[test]
    fn test_clamp_policy() {
        let mut state = ListState::new(colors(), 0, SelectionMode::Single, 24, &config(7, 2));
        assert_eq!(state.handle_key(KeyPress::Up), EventLoopResult::Continue);
        state.handle_key(KeyPress::End);
        assert_eq!(state.handle_key(KeyPress::Down), EventLoopResult::Continue);
        assert_eq!(state.selected_index(), Some(5));
    }

    #[test]
    fn test_wrap_policy() {
        let config = ListConfig {
            boundary_policy: BoundaryPolicy::Wrap,
            ..config(7, 2)
        };
        let mut state = ListState::new(colors(), 0, SelectionMode::Single, 24, &config);
        state.handle_key(KeyPress::BackTab);
        assert_eq!(state.selected_index(), Some(5));
        state.handle_key(KeyPress::Tab);
        assert_eq!(state.selected_index(), Some(0));
    }

    #[test]
    fn test_page_keys_clip() {
        let labels: Vec<String> = (0..20).map(|it| format!("item {it}")).collect();
        let mut state = ListState::new(labels, 0, SelectionMode::Single, 24, &config(5, 1));
        state.handle_key(KeyPress::PageDown);
        assert_eq!(state.selection(), 5);
        state.handle_key(KeyPress::PageUp);
        state.handle_key(KeyPress::PageUp);
        assert_eq!(state.selection(), 0);
        for _ in 0..10 {
            state.handle_key(KeyPress::PageDown);
        }
        assert_eq!(state.selection(), 19);
    }

    #[test]
    fn test_vi_keys_only_without_search() {
        let mut state = ListState::new(colors(), 0, SelectionMode::Single, 24, &config(7, 2));
        state.handle_key(KeyPress::Char('j'));
        state.handle_key(KeyPress::Char('s'));
        state.handle_key(KeyPress::Char('k'));
        assert_eq!(state.selected_index(), Some(1));

        let mut state = ListState::new(colors(), 0, SelectionMode::Single, 24, &config(3, 1));
        state.handle_key(KeyPress::Char('j'));
        assert_eq!(state.query().unwrap().text(), "j");
    }

    #[test]
    fn test_terminal_states() {
        let mut state = ListState::new(colors(), 2, SelectionMode::Single, 24, &config(7, 2));
        assert_eq!(state.handle_key(KeyPress::Enter), EventLoopResult::ExitWithResult(vec![2]));
        assert_eq!(state.handle_key(KeyPress::EndOfInput), EventLoopResult::ExitWithResult(vec![2]));
        assert_eq!(state.handle_key(KeyPress::Interrupt), EventLoopResult::ExitWithInterrupt);
        assert_eq!(state.handle_key(KeyPress::Esc), EventLoopResult::ExitWithoutResult);
    }

    #[test]
    fn test_configured_select_key() {
        let config = ListConfig {
            select_key: Some(' '),
            ..config(7, 2)
        };
        let mut state = ListState::new(colors(), 1, SelectionMode::Single, 24, &config);
        assert_eq!(
            state.handle_key(KeyPress::Char(' ')),
            EventLoopResult::ExitWithResult(vec![1])
        );
    }

    #[test]
    fn test_checklist_toggles() {
        let mut state = ListState::new(colors(), 0, SelectionMode::Multiple, 24, &config(7, 2));
        // Index 2 twice, index 4 once, index 5 three times.
        let script = [
            (2, 2),
            (4, 1),
            (5, 3),
        ];
        for (index, times) in script {
            state.handle_key(KeyPress::Home);
            for _ in 0..index {
                state.handle_key(KeyPress::Down);
            }
            for _ in 0..times {
                assert_eq!(
                    state.handle_key(KeyPress::Char(' ')),
                    EventLoopResult::ContinueAndRerender(ListRedraw::rows(RowRedraw::Rows(
                        vec![index - state.viewport().start]
                    )))
                );
            }
        }
        assert_eq!(
            state.handle_key(KeyPress::Enter),
            EventLoopResult::ExitWithResult(vec![4, 5])
        );
    }

    #[test]
    fn test_checklist_space_never_enters_query() {
        let labels: Vec<String> = (0..20).map(|it| format!("item {it}")).collect();
        let mut state = ListState::new(labels, 0, SelectionMode::Multiple, 24, &config(5, 1))
            .with_checked(&[3, 99]);
        type_query(&mut state, "1 ");
        assert_eq!(state.query().unwrap().text(), "1");
        assert_eq!(state.checked_indices(), vec![1, 3]);
    }

    #[test]
    fn test_query_cursor_moves_without_refilter() {
        let mut state = ListState::new(colors(), 0, SelectionMode::Single, 24, &config(3, 1));
        type_query(&mut state, "re");
        let step = state.handle_key(KeyPress::Left);
        assert_eq!(
            step,
            EventLoopResult::ContinueAndRerender(ListRedraw {
                query: Some(LinePatch {
                    move_before: -1,
                    ..LinePatch::default()
                }),
                rows: RowRedraw::Nothing,
            })
        );
        type_query(&mut state, "x");
        assert_eq!(state.query().unwrap().text(), "rxe");
    }

    #[test]
    fn test_window_invariants_under_random_walk() {
        let labels: Vec<String> = (0..50).map(|it| format!("option {it}")).collect();
        let keys = [
            KeyPress::Down,
            KeyPress::PageDown,
            KeyPress::Up,
            KeyPress::End,
            KeyPress::PageUp,
            KeyPress::Home,
            KeyPress::Char('1'),
            KeyPress::Down,
            KeyPress::Backspace,
            KeyPress::Tab,
        ];
        let mut state = ListState::new(labels, 25, SelectionMode::Single, 10, &config(7, 2));
        for round in 0..40 {
            state.handle_key(keys[(round * 7) % keys.len()]);
            let viewport = state.viewport();
            let count = state.filtered().len();
            assert!(viewport.start + viewport.height <= count);
            if count > 0 {
                assert!(viewport.contains(state.selection()));
            }
        }
    }
}
