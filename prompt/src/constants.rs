// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::style::Color;

// Colors.
pub const LIZARD_GREEN_COLOR: Color = Color::Rgb { r: 20, g: 244, b: 0 };
pub const DUSTY_LIGHT_BLUE_COLOR: Color = Color::Rgb { r: 171, g: 204, b: 242 };
pub const LIGHT_GRAY_COLOR: Color = Color::Rgb { r: 94, g: 103, b: 111 };
pub const SUCCESS_COLOR: Color = LIZARD_GREEN_COLOR;
pub const FAILED_COLOR: Color = Color::DarkRed;

// List defaults.
pub const DEFAULT_MAX_VISIBLE_LINES: usize = 7;
pub const DEFAULT_SCROLL_MARGIN: usize = 2;
pub const DEFAULT_SEARCH_THRESHOLD: usize = 10;
pub const DEFAULT_MAX_OPTION_COUNT: usize = 256;

/// Used when the terminal size can't be queried.
pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_HEIGHT: usize = 24;

// Row glyphs.
pub const IS_FOCUSED: &str = " › ";
pub const IS_NOT_FOCUSED: &str = "   ";
pub const CHECKED: &str = "[×] ";
pub const NOT_CHECKED: &str = "[ ] ";
pub const ELLIPSIS: &str = "...";

// Prompt text.
pub const LABEL_SEPARATOR: &str = ": ";
pub const NO_OPTIONS_FOUND: &str = "no options found";
pub const CHECKLIST_HINT: &str = " (space selects)";
pub const CANCELLED_MARKER: &str = "^C";
pub const ERROR_PREFIX: &str = "ERROR: ";
pub const YES: &str = "yes";
pub const NO: &str = "no";
pub const YES_NO_HINT_DEFAULT_YES: &str = " [Y/n]";
pub const YES_NO_HINT_DEFAULT_NO: &str = " [y/N]";
pub const YES_NO_HINT: &str = " [y/n]";
pub const ENTER_HINT: &str = " [enter]";

/// Default log file used by [`crate::try_initialize_logging`].
pub const DEFAULT_LOG_FILE_PATH: &str = "rprompt_log.txt";

/// Exit status used when an interrupt can't be re-raised as a signal.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;
