// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Predicates that run over a coerced [`Value`] after a text prompt is submitted. A
//! rejection is a human readable message that is shown above the input line, and the
//! user gets to fix the entered text.
//!
//! ```
//! use r3bl_prompt::{validate_all, validators, Value};
//!
//! let port = [validators::port()];
//! assert_eq!(validate_all(&port, &Value::UInt(8080)), Ok(()));
//! assert_eq!(
//!     validate_all(&port, &Value::UInt(0)),
//!     Err("out of range [1,65535]".to_string())
//! );
//! ```

use std::{fmt::{Debug, Formatter},
          path::Path,
          sync::Arc};

use chrono::NaiveDateTime;
use regex::Regex;

use crate::Value;

pub type ValidateFn = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

#[derive(Clone)]
pub struct Validator(Arc<ValidateFn>);

impl Validator {
    pub fn new(validate: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(validate))
    }

    /// # Errors
    ///
    /// Returns the rejection message.
    pub fn validate(&self, value: &Value) -> Result<(), String> { (self.0)(value) }
}

impl Debug for Validator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "Validator") }
}

/// Runs `validators` in order and stops at the first rejection.
///
/// # Errors
///
/// Returns the message of the first validator that rejects `value`.
pub fn validate_all(validators: &[Validator], value: &Value) -> Result<(), String> {
    validators
        .iter()
        .try_for_each(|validator| validator.validate(value))
}

fn expect_text(value: &Value) -> Result<&str, String> {
    value.as_text().ok_or_else(|| "expected string".to_string())
}

/// Inclusive length bounds, counted in code points. `max` of `None` is open.
#[must_use]
pub fn str_length(min: usize, max: Option<usize>) -> Validator {
    Validator::new(move |value| {
        let length = expect_text(value)?.chars().count();
        if length < min {
            return Err(format!("too short, minimum is {min}"));
        }
        match max {
            Some(max) if max < length => Err(format!("too long, maximum is {max}")),
            _ => Ok(()),
        }
    })
}

/// Inclusive numeric bounds for any integer or float value. `NaN` is an open bound.
#[must_use]
pub fn num_range(min: f64, max: f64) -> Validator {
    Validator::new(move |value| {
        let number = value
            .as_f64()
            .ok_or_else(|| "expected integer or floating point".to_string())?;
        if (!min.is_nan() && number < min) || (!max.is_nan() && max < number) {
            Err(format!("out of range [{min},{max}]"))
        } else {
            Ok(())
        }
    })
}

/// Inclusive timestamp bounds. `None` is open.
#[must_use]
pub fn date_range(min: Option<NaiveDateTime>, max: Option<NaiveDateTime>) -> Validator {
    Validator::new(move |value| {
        let timestamp = value
            .as_timestamp()
            .ok_or_else(|| "expected timestamp".to_string())?;
        let too_early = min.is_some_and(|min| timestamp < min);
        let too_late = max.is_some_and(|max| max < timestamp);
        if too_early || too_late {
            let show = |bound: Option<NaiveDateTime>| {
                bound.map(|it| Value::Timestamp(it).to_string()).unwrap_or_default()
            };
            Err(format!("out of range [{},{}]", show(min), show(max)))
        } else {
            Ok(())
        }
    })
}

#[must_use]
pub fn prefix(affix: impl Into<String>) -> Validator {
    let affix = affix.into();
    Validator::new(move |value| {
        if expect_text(value)?.starts_with(&affix) {
            Ok(())
        } else {
            Err(format!("expected prefix '{affix}'"))
        }
    })
}

#[must_use]
pub fn suffix(affix: impl Into<String>) -> Validator {
    let affix = affix.into();
    Validator::new(move |value| {
        if expect_text(value)?.ends_with(&affix) {
            Ok(())
        } else {
            Err(format!("expected suffix '{affix}'"))
        }
    })
}

/// Compares values of the same kind: integers, floats or timestamps.
fn compare_ordered(
    bound: &Value,
    value: &Value,
) -> Result<Option<std::cmp::Ordering>, String> {
    match (value, bound) {
        (Value::Int(lhs), Value::Int(rhs)) => Ok(lhs.partial_cmp(rhs)),
        (Value::UInt(lhs), Value::UInt(rhs)) => Ok(lhs.partial_cmp(rhs)),
        (Value::Float(lhs), Value::Float(rhs)) => Ok(lhs.partial_cmp(rhs)),
        (Value::Timestamp(lhs), Value::Timestamp(rhs)) => Ok(lhs.partial_cmp(rhs)),
        (Value::Text(_) | Value::Bool(_), _) | (_, Value::Text(_) | Value::Bool(_)) => {
            Err("expected integer, floating point, or timestamp".to_string())
        }
        _ => Err(format!("expected {}", bound.kind_name())),
    }
}

/// Strictly less than `bound`.
#[must_use]
pub fn before(bound: Value) -> Validator {
    Validator::new(move |value| match compare_ordered(&bound, value)? {
        Some(std::cmp::Ordering::Less) => Ok(()),
        _ => Err(format!("must be before {bound}")),
    })
}

/// Strictly greater than `bound`.
#[must_use]
pub fn after(bound: Value) -> Validator {
    Validator::new(move |value| match compare_ordered(&bound, value)? {
        Some(std::cmp::Ordering::Greater) => Ok(()),
        _ => Err(format!("must be after {bound}")),
    })
}

/// Matches the displayed form of the value against `pattern`. A pattern that doesn't
/// compile rejects every value with the compile error.
#[must_use]
pub fn pattern(pattern: &str, message: impl Into<String>) -> Validator {
    let message = message.into();
    match Regex::new(pattern) {
        Ok(regex) => Validator::new(move |value| {
            if regex.is_match(&value.to_string()) {
                Ok(())
            } else {
                Err(message.clone())
            }
        }),
        Err(error) => {
            tracing::warn!(message = "validator pattern does not compile", %error);
            let error = error.to_string();
            Validator::new(move |_| Err(error.clone()))
        }
    }
}

#[must_use]
pub fn email_address() -> Validator {
    pattern(
        r"^[\w\.-]+@([a-z0-9][a-z0-9-]{0,61}[a-z0-9]\.)+[a-z0-9]{2,63}$",
        "invalid e-mail address",
    )
}

#[must_use]
pub fn ip_address() -> Validator {
    pattern(
        r"^([0-9]{1,3}\.){3}[0-9]{1,3}$|^(([a-fA-F0-9]{1,4}|):){1,7}([a-fA-F0-9]{1,4}|:)$",
        "invalid IP address",
    )
}

#[must_use]
pub fn ipv4_address() -> Validator {
    pattern(r"^([0-9]{1,3}\.){3}[0-9]{1,3}$", "invalid IPv4 address")
}

#[must_use]
pub fn ipv6_address() -> Validator {
    pattern(
        r"^(([a-fA-F0-9]{1,4}|):){1,7}([a-fA-F0-9]{1,4}|:)$",
        "invalid IPv6 address",
    )
}

#[must_use]
pub fn port() -> Validator { num_range(1.0, 65535.0) }

#[must_use]
pub fn path() -> Validator { pattern(r"^([^/]+)?/([^/]+/)*([^/]+)?$", "invalid path") }

#[must_use]
pub fn absolute_path() -> Validator {
    pattern(r"^/([^/]+/)*([^/]+)?$", "invalid absolute path")
}

/// A Unix user name.
#[must_use]
pub fn user_name() -> Validator {
    pattern(
        r"^[a-z_]([a-z0-9_-]{1,31}|[a-z0-9_-]{1,30}\$)$",
        "invalid user name",
    )
}

#[must_use]
pub fn top_domain_name() -> Validator {
    pattern(
        r"^[a-z0-9][a-z0-9-]{0,61}[a-z0-9]\.[a-z0-9]{2,63}$",
        "invalid top-level domain name",
    )
}

#[must_use]
pub fn domain_name() -> Validator {
    pattern(
        r"^([a-z0-9][a-z0-9-]{0,61}[a-z0-9]\.)+[a-z0-9]{2,63}$",
        "invalid domain name",
    )
}

/// Fully qualified domain name, with the trailing dot.
#[must_use]
pub fn fqdn() -> Validator {
    pattern(
        r"^([a-z0-9][a-z0-9-]{0,61}[a-z0-9]\.)+[a-z0-9]{2,63}\.$",
        "invalid fully qualified domain name",
    )
}

/// An existing directory.
#[must_use]
pub fn dir() -> Validator {
    Validator::new(|value| {
        let text = expect_text(value)?;
        let path = Path::new(text);
        if !path.exists() {
            Err(format!("file not found: {text}"))
        } else if !path.is_dir() {
            Err(format!("path is not directory: {text}"))
        } else {
            Ok(())
        }
    })
}

/// An existing regular file.
#[must_use]
pub fn file() -> Validator {
    Validator::new(|value| {
        let text = expect_text(value)?;
        let path = Path::new(text);
        if !path.exists() {
            Err(format!("file not found: {text}"))
        } else if !path.is_file() {
            Err(format!("path is not regular file: {text}"))
        } else {
            Ok(())
        }
    })
}

/// Exactly `expected`.
#[must_use]
pub fn is(expected: Value) -> Validator {
    Validator::new(move |value| {
        if std::mem::discriminant(value) != std::mem::discriminant(&expected) {
            Err(format!("expected {}", expected.kind_name()))
        } else if *value == expected {
            Ok(())
        } else {
            Err(format!("expected '{expected}'"))
        }
    })
}

/// One of `list`.
#[must_use]
pub fn in_list(list: Vec<Value>) -> Validator {
    Validator::new(move |value| {
        if list.contains(value) {
            Ok(())
        } else {
            Err("not available".to_string())
        }
    })
}

/// None of `list`.
#[must_use]
pub fn not_in(list: Vec<Value>) -> Validator {
    Validator::new(move |value| {
        if list.contains(value) {
            Err("not available".to_string())
        } else {
            Ok(())
        }
    })
}

#[must_use]
pub fn not(validator: Validator) -> Validator {
    Validator::new(move |value| match validator.validate(value) {
        Ok(()) => Err("not available".to_string()),
        Err(_) => Ok(()),
    })
}

/// All of `validators`, reporting the first rejection. Mostly useful inside [`or`].
#[must_use]
pub fn and(validators: Vec<Validator>) -> Validator {
    Validator::new(move |value| validate_all(&validators, value))
}

/// At least one of `validators`. An empty list accepts everything.
#[must_use]
pub fn or(validators: Vec<Validator>) -> Validator {
    Validator::new(move |value| {
        if validators.is_empty() || validators.iter().any(|it| it.validate(value).is_ok()) {
            Ok(())
        } else {
            Err("not available".to_string())
        }
    })
}

/// Accepts empty text, otherwise defers to `validator`. Makes a field optional.
#[must_use]
pub fn empty_or(validator: Validator) -> Validator {
    Validator::new(move |value| match value {
        Value::Text(text) if text.is_empty() => Ok(()),
        other => validator.validate(other),
    })
}
