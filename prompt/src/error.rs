// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Errors that end a prompt. Validation rejections are not errors, they are plain
//! messages that get rendered inline while the prompt keeps running (see
//! [`crate::Validator`]). Interrupt and escape are not errors either, they are
//! [`crate::PromptOutcome`] variants.

use std::io;

/// Everything in this enum except [`PromptError::Io`] is a configuration error, and it is
/// reported before the terminal is switched into raw mode.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum PromptError {
    #[error(transparent)]
    #[diagnostic(code(r3bl_prompt::io))]
    Io(#[from] io::Error),

    #[error("no options")]
    #[diagnostic(
        code(r3bl_prompt::no_options),
        help("Pass at least one option to select from")
    )]
    NoOptions,

    #[error("too many options: {count} (the maximum is {max})")]
    #[diagnostic(
        code(r3bl_prompt::too_many_options),
        help("Raise `ListConfig::max_option_count` or pass fewer options")
    )]
    TooManyOptions { count: usize, max: usize },

    #[error("destination kind `{expected}` does not match default kind `{found}`")]
    #[diagnostic(code(r3bl_prompt::destination_mismatch))]
    DestinationMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("stdin is not an interactive terminal")]
    #[diagnostic(
        code(r3bl_prompt::not_interactive),
        help("Prompts need a TTY, they can't read from a pipe")
    )]
    NotInteractive,

    #[error("invalid configuration: {0}")]
    #[diagnostic(code(r3bl_prompt::invalid_config))]
    InvalidConfig(String),
}

impl PromptError {
    /// Configuration errors are detected before raw mode is entered.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool { !matches!(self, PromptError::Io(_)) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(PromptError::NoOptions.to_string(), "no options");
        assert_eq!(
            PromptError::TooManyOptions { count: 300, max: 256 }.to_string(),
            "too many options: 300 (the maximum is 256)"
        );
        assert_eq!(
            PromptError::DestinationMismatch {
                expected: "integer",
                found: "text"
            }
            .to_string(),
            "destination kind `integer` does not match default kind `text`"
        );
    }

    #[test]
    fn test_io_is_not_a_configuration_error() {
        let io_error = PromptError::from(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(!io_error.is_configuration_error());
        assert!(PromptError::NoOptions.is_configuration_error());
    }
}
