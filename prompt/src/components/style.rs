// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::Display;

use crossterm::style::{Attribute, Color, ContentStyle, StyledContent};

use crate::{DUSTY_LIGHT_BLUE_COLOR, FAILED_COLOR, LIGHT_GRAY_COLOR, SUCCESS_COLOR};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Style {
    pub fg_color: Option<Color>,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
}

impl Style {
    /// Wraps `content` so that `PrintStyledContent` sets this style, prints, and then
    /// resets it.
    pub fn apply<D: Display>(&self, content: D) -> StyledContent<D> {
        let mut content_style = ContentStyle::new();
        content_style.foreground_color = self.fg_color;
        if self.bold {
            content_style.attributes.set(Attribute::Bold);
        }
        if self.dim {
            content_style.attributes.set(Attribute::Dim);
        }
        if self.italic {
            content_style.attributes.set(Attribute::Italic);
        }
        StyledContent::new(content_style, content)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StyleSheet {
    /// The prompt label.
    pub label_style: Style,
    /// Hints after the label, like `[Y/n]` or `(space selects)`.
    pub hint_style: Style,
    pub normal_style: Style,
    /// The row under the cursor.
    pub focused_style: Style,
    /// `no options found`.
    pub placeholder_style: Style,
    pub error_style: Style,
    /// The result printed after the label once the prompt is done.
    pub summary_style: Style,
}

impl Default for StyleSheet {
    fn default() -> Self {
        let label_style = Style {
            bold: true,
            ..Style::default()
        };
        let hint_style = Style {
            fg_color: Some(LIGHT_GRAY_COLOR),
            ..Style::default()
        };
        let focused_style = Style {
            fg_color: Some(DUSTY_LIGHT_BLUE_COLOR),
            bold: true,
            ..Style::default()
        };
        let placeholder_style = Style {
            fg_color: Some(LIGHT_GRAY_COLOR),
            italic: true,
            ..Style::default()
        };
        let error_style = Style {
            fg_color: Some(FAILED_COLOR),
            bold: true,
            ..Style::default()
        };
        let summary_style = Style {
            fg_color: Some(SUCCESS_COLOR),
            ..Style::default()
        };
        StyleSheet {
            label_style,
            hint_style,
            normal_style: Style::default(),
            focused_style,
            placeholder_style,
            error_style,
            summary_style,
        }
    }
}

impl StyleSheet {
    /// No colors or attributes at all, for dumb terminals and for tests.
    #[must_use]
    pub fn plain() -> Self {
        StyleSheet {
            label_style: Style::default(),
            hint_style: Style::default(),
            normal_style: Style::default(),
            focused_style: Style::default(),
            placeholder_style: Style::default(),
            error_style: Style::default(),
            summary_style: Style::default(),
        }
    }
}
