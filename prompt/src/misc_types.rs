// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use clap::ValueEnum;

use crate::{PromptError,
            Value,
            DEFAULT_MAX_OPTION_COUNT,
            DEFAULT_MAX_VISIBLE_LINES,
            DEFAULT_SCROLL_MARGIN,
            DEFAULT_SEARCH_THRESHOLD};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum SelectionMode {
    /// Pick one option.
    #[default]
    Single,
    /// Check any number of options (checklist).
    Multiple,
}

/// What moving past either end of the list does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum BoundaryPolicy {
    /// Stay on the first / last option.
    #[default]
    Clamp,
    /// Jump to the other end of the list.
    Wrap,
}

/// Per invocation settings for [`crate::select`] and [`crate::checklist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListConfig {
    pub max_visible_lines: usize,
    /// Rows kept between the selection and the window edge while scrolling.
    pub scroll_margin: usize,
    /// Search turns on when there are more options than this, or more than fit in the
    /// window.
    pub search_threshold: usize,
    pub boundary_policy: BoundaryPolicy,
    pub max_option_count: usize,
    /// An extra key that accepts in single select mode. Checklists always toggle with
    /// space.
    pub select_key: Option<char>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            max_visible_lines: DEFAULT_MAX_VISIBLE_LINES,
            scroll_margin: DEFAULT_SCROLL_MARGIN,
            search_threshold: DEFAULT_SEARCH_THRESHOLD,
            boundary_policy: BoundaryPolicy::default(),
            max_option_count: DEFAULT_MAX_OPTION_COUNT,
            select_key: None,
        }
    }
}

impl ListConfig {
    /// # Errors
    ///
    /// Returns [`PromptError::InvalidConfig`] for a window without rows, or a list that
    /// can't hold any options.
    pub fn validate(&self) -> Result<(), PromptError> {
        if self.max_visible_lines == 0 {
            return Err(PromptError::InvalidConfig(
                "max_visible_lines must be at least 1".to_string(),
            ));
        }
        if self.max_option_count == 0 {
            return Err(PromptError::InvalidConfig(
                "max_option_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Seeds the line editor of [`crate::prompt`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptConfig {
    /// Pre-filled (and editable) text. Must match the prompt's target kind.
    pub default: Option<Value>,
    /// Clipped to the length of the default text. Defaults to its end.
    pub initial_cursor: Option<usize>,
}

impl PromptConfig {
    #[must_use]
    pub fn with_default(default: Value) -> Self {
        Self {
            default: Some(default),
            initial_cursor: None,
        }
    }
}

/// What a prompt ended with. Interrupt and escape are control outcomes, distinct from
/// both a value and an error.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptOutcome<T> {
    Accepted(T),
    /// `Ctrl+C`. The interrupt has been forwarded to the process by the time this is
    /// returned.
    Cancelled,
    /// `Esc`. Nothing changed.
    Escaped,
}

impl<T> PromptOutcome<T> {
    pub fn accepted(self) -> Option<T> {
        match self {
            PromptOutcome::Accepted(it) => Some(it),
            PromptOutcome::Cancelled | PromptOutcome::Escaped => None,
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool { matches!(self, PromptOutcome::Accepted(_)) }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PromptOutcome<U> {
        match self {
            PromptOutcome::Accepted(it) => PromptOutcome::Accepted(f(it)),
            PromptOutcome::Cancelled => PromptOutcome::Cancelled,
            PromptOutcome::Escaped => PromptOutcome::Escaped,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_list_config_validation() {
        assert!(ListConfig::default().validate().is_ok());
        let no_rows = ListConfig {
            max_visible_lines: 0,
            ..ListConfig::default()
        };
        assert!(matches!(no_rows.validate(), Err(PromptError::InvalidConfig(_))));
    }

    #[test]
    fn test_outcome_map() {
        assert_eq!(PromptOutcome::Accepted(2).map(|it| it * 2), PromptOutcome::Accepted(4));
        assert_eq!(PromptOutcome::<i32>::Cancelled.map(|it| it * 2), PromptOutcome::Cancelled);
        assert_eq!(PromptOutcome::<i32>::Escaped.accepted(), None);
    }
}
