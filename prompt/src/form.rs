// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A [`Form`] queues up fields and then asks for them one after another, with all
//! the labels right aligned so the answers line up:
//!
//! ```text
//!  Name: Ada
//!   Age: 36
//! Color: Blue
//! ```

use std::{fmt::Display, io::Write};

use crate::{KeyPressReader,
            ListConfig,
            PromptConfig,
            PromptError,
            PromptOutcome,
            PromptSession,
            SelectOption,
            TargetKind,
            Validator,
            Value,
            LABEL_SEPARATOR};

#[derive(Debug)]
enum FormField {
    Print {
        text: String,
    },
    Prompt {
        kind: TargetKind,
        config: PromptConfig,
        validators: Vec<Validator>,
    },
    Select {
        options: Vec<SelectOption<Value>>,
        initial: usize,
        config: ListConfig,
    },
}

#[derive(Debug, Default)]
pub struct Form {
    fields: Vec<(String, FormField)>,
}

/// The answers of a completed [`Form`], keyed by field label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    entries: Vec<(String, Value)>,
}

impl FormValues {
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(it, value)| (it == label).then_some(value))
    }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(label, value)| (label.as_str(), value))
    }
}

impl Form {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// A read only line: `label: value`.
    #[must_use]
    pub fn print(mut self, label: impl Into<String>, value: impl Display) -> Self {
        self.fields.push((
            label.into(),
            FormField::Print {
                text: value.to_string(),
            },
        ));
        self
    }

    #[must_use]
    pub fn prompt(
        mut self,
        label: impl Into<String>,
        kind: TargetKind,
        config: PromptConfig,
        validators: Vec<Validator>,
    ) -> Self {
        self.fields.push((
            label.into(),
            FormField::Prompt {
                kind,
                config,
                validators,
            },
        ));
        self
    }

    #[must_use]
    pub fn select(
        mut self,
        label: impl Into<String>,
        options: Vec<SelectOption<Value>>,
        initial: usize,
        config: ListConfig,
    ) -> Self {
        self.fields.push((
            label.into(),
            FormField::Select {
                options,
                initial,
                config,
            },
        ));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize { self.fields.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    /// Runs every field in order. Stops at the first field that fails, or that the
    /// user escapes or cancels, and returns that outcome.
    ///
    /// # Errors
    ///
    /// Returns the first [`PromptError`] any field produces.
    pub fn run<W: Write, K: KeyPressReader>(
        self,
        session: &mut PromptSession<W, K>,
    ) -> Result<PromptOutcome<FormValues>, PromptError> {
        let label_width = self
            .fields
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or_default();
        let mut values = FormValues::default();

        for (label, field) in self.fields {
            let padded_label = format!("{label:>label_width$}");
            let outcome = match field {
                FormField::Print { text } => {
                    session.print(&format!("{padded_label}{LABEL_SEPARATOR}{text}"))?;
                    continue;
                }
                FormField::Prompt {
                    kind,
                    config,
                    validators,
                } => session.prompt(&padded_label, kind, &config, validators)?,
                FormField::Select {
                    options,
                    initial,
                    config,
                } => session.select(&padded_label, options, initial, &config)?,
            };
            match outcome {
                PromptOutcome::Accepted(value) => values.entries.push((label, value)),
                PromptOutcome::Escaped => return Ok(PromptOutcome::Escaped),
                PromptOutcome::Cancelled => return Ok(PromptOutcome::Cancelled),
            }
        }

        Ok(PromptOutcome::Accepted(values))
    }
}
