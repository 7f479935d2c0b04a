// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Turns the text typed into a prompt into a typed [`Value`]. The caller declares the
//! [`TargetKind`] up front, there is one coercion function per kind, and anything else
//! goes through a [`CustomParser`].

use std::{fmt::{Debug, Display, Formatter},
          num::IntErrorKind,
          sync::Arc};

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{NO, YES};

/// Display format for [`Value::Timestamp`].
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats tried in order after RFC 3339.
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Timestamp(NaiveDateTime),
}

impl Value {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Timestamp(_) => "timestamp",
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(it) => Some(it),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(it) => Some(*it),
            _ => None,
        }
    }

    /// Any numeric value, widened to `f64`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(it) => Some(*it as f64),
            Value::UInt(it) => Some(*it as f64),
            Value::Float(it) => Some(*it),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(it) => Some(*it),
            _ => None,
        }
    }

    /// The text that pre-fills the line editor when this value is a prompt default.
    #[must_use]
    pub fn to_edit_text(&self) -> String {
        match self {
            Value::Bool(true) => "true".to_string(),
            Value::Bool(false) => "false".to_string(),
            other => other.to_string(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(it) => write!(f, "{it}"),
            Value::Bool(it) => write!(f, "{}", if *it { YES } else { NO }),
            Value::Int(it) => write!(f, "{it}"),
            Value::UInt(it) => write!(f, "{it}"),
            Value::Float(it) => write!(f, "{it}"),
            Value::Timestamp(it) => write!(f, "{}", it.format(TIMESTAMP_DISPLAY_FORMAT)),
        }
    }
}

impl From<&str> for Value {
    fn from(it: &str) -> Self { Value::Text(it.to_string()) }
}

impl From<String> for Value {
    fn from(it: String) -> Self { Value::Text(it) }
}

impl From<bool> for Value {
    fn from(it: bool) -> Self { Value::Bool(it) }
}

impl From<i64> for Value {
    fn from(it: i64) -> Self { Value::Int(it) }
}

impl From<u64> for Value {
    fn from(it: u64) -> Self { Value::UInt(it) }
}

impl From<f64> for Value {
    fn from(it: f64) -> Self { Value::Float(it) }
}

impl From<NaiveDateTime> for Value {
    fn from(it: NaiveDateTime) -> Self { Value::Timestamp(it) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }

    fn signed_range(self) -> (i64, i64) {
        match self {
            IntWidth::W64 => (i64::MIN, i64::MAX),
            other => {
                let max = (1_i64 << (other.bits() - 1)) - 1;
                (-max - 1, max)
            }
        }
    }

    fn unsigned_max(self) -> u64 {
        match self {
            IntWidth::W64 => u64::MAX,
            other => (1_u64 << other.bits()) - 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    F32,
    F64,
}

pub type ParseFn = dyn Fn(&str) -> Result<Value, String> + Send + Sync;

/// A caller supplied conversion, for destination types this crate doesn't know about.
#[derive(Clone)]
pub struct CustomParser {
    pub name: String,
    pub parse: Arc<ParseFn>,
}

impl CustomParser {
    pub fn new(
        name: impl Into<String>,
        parse: impl Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            parse: Arc::new(parse),
        }
    }
}

impl Debug for CustomParser {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomParser").field("name", &self.name).finish_non_exhaustive()
    }
}

/// The destination of a text prompt.
#[derive(Debug, Clone)]
pub enum TargetKind {
    Text,
    Bool,
    Int(IntWidth),
    UInt(IntWidth),
    Float(FloatWidth),
    Timestamp,
    Custom(CustomParser),
}

impl TargetKind {
    /// Matches [`Value::kind_name`] for the built-in kinds.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            TargetKind::Text => "text",
            TargetKind::Bool => "bool",
            TargetKind::Int(_) => "int",
            TargetKind::UInt(_) => "uint",
            TargetKind::Float(_) => "float",
            TargetKind::Timestamp => "timestamp",
            TargetKind::Custom(_) => "custom",
        }
    }

    /// Like [`TargetKind::kind_name`], but custom kinds use their parser's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            TargetKind::Custom(parser) => &parser.name,
            other => other.kind_name(),
        }
    }

    #[must_use]
    pub fn is_bool(&self) -> bool { matches!(self, TargetKind::Bool) }

    /// Whether `value` can seed a prompt of this kind. Custom kinds accept anything,
    /// since the parser decides what it produces.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (TargetKind::Text, Value::Text(_))
            | (TargetKind::Bool, Value::Bool(_))
            | (TargetKind::Float(_), Value::Float(_))
            | (TargetKind::Timestamp, Value::Timestamp(_))
            | (TargetKind::Custom(_), _) => true,
            (TargetKind::Int(width), Value::Int(it)) => {
                let (min, max) = width.signed_range();
                (min..=max).contains(it)
            }
            (TargetKind::UInt(width), Value::UInt(it)) => *it <= width.unsigned_max(),
            _ => false,
        }
    }

    /// Converts the submitted text. Surrounding whitespace is only significant for
    /// [`TargetKind::Text`].
    ///
    /// # Errors
    ///
    /// Returns the message shown on the error row when `input` doesn't convert.
    pub fn coerce(&self, input: &str) -> Result<Value, String> {
        match self {
            TargetKind::Text => Ok(Value::Text(input.to_string())),
            TargetKind::Bool => parse_bool(input.trim())
                .map(Value::Bool)
                .ok_or_else(|| "invalid boolean".to_string()),
            TargetKind::Int(width) => parse_int(input.trim(), *width).map(Value::Int),
            TargetKind::UInt(width) => parse_uint(input.trim(), *width).map(Value::UInt),
            TargetKind::Float(width) => parse_float(input.trim(), *width).map(Value::Float),
            TargetKind::Timestamp => parse_timestamp(input.trim())
                .map(Value::Timestamp)
                .ok_or_else(|| "invalid datetime".to_string()),
            TargetKind::Custom(parser) => (parser.parse)(input.trim())
                .map_err(|reason| format!("invalid {}: {reason}", parser.name)),
        }
    }
}

/// Affirmative / negative keywords plus the usual boolean literals.
#[must_use]
pub fn parse_bool(input: &str) -> Option<bool> {
    match input {
        "y" | "Y" | "yes" | "YES" | "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "n" | "N" | "no" | "NO" | "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn parse_int(input: &str, width: IntWidth) -> Result<i64, String> {
    let parsed = input.parse::<i64>().map_err(|error| match error.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => "integer overflow".to_string(),
        _ => "invalid integer".to_string(),
    })?;
    let (min, max) = width.signed_range();
    if (min..=max).contains(&parsed) {
        Ok(parsed)
    } else {
        Err("integer overflow".to_string())
    }
}

fn parse_uint(input: &str, width: IntWidth) -> Result<u64, String> {
    let parsed = input.parse::<u64>().map_err(|error| match error.kind() {
        IntErrorKind::PosOverflow => "integer overflow".to_string(),
        _ => "invalid positive integer".to_string(),
    })?;
    if parsed <= width.unsigned_max() {
        Ok(parsed)
    } else {
        Err("integer overflow".to_string())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn parse_float(input: &str, width: FloatWidth) -> Result<f64, String> {
    let parsed = input
        .parse::<f64>()
        .map_err(|_| "invalid floating point".to_string())?;
    let is_explicit_infinity = input.to_ascii_lowercase().contains("inf");
    let overflowed = match width {
        FloatWidth::F64 => parsed.is_infinite(),
        FloatWidth::F32 => (parsed as f32).is_infinite(),
    };
    if overflowed && !is_explicit_infinity {
        return Err("floating point overflow".to_string());
    }
    Ok(match width {
        FloatWidth::F64 => parsed,
        FloatWidth::F32 => f64::from(parsed as f32),
    })
}

#[must_use]
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    if let Ok(it) = DateTime::parse_from_rfc3339(input) {
        return Some(it.naive_utc());
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(it) = NaiveDateTime::parse_from_str(input, format) {
            return Some(it);
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
