use std::fmt;
use serde_json::{Map, Number, Value};
use crate::error::{GlueError, Result};

/// A value handed in by a user facing command before it is sent to the charger.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Fields(Map<String, Value>),
}

impl RawValue {
    /// The textual form the coercion rules are matched against.
    pub fn as_text(&self) -> String {
        match self {
            RawValue::Text(text) => text.clone(),
            RawValue::Bool(value) => value.to_string(),
            RawValue::Int(value) => value.to_string(),
            RawValue::Float(value) => format!("{:?}", value),
            RawValue::Fields(fields) => Value::Object(fields.clone()).to_string(),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceType {
    Str,
    Bool,
    Int,
    Float,
}

impl ForceType {
    /// Case-insensitive; unknown hints are ignored.
    pub fn parse(hint: &str) -> Option<Self> {
        match hint.to_ascii_lowercase().as_str() {
            "str" => Some(ForceType::Str),
            "bool" => Some(ForceType::Bool),
            "int" => Some(ForceType::Int),
            "float" => Some(ForceType::Float),
            _ => None,
        }
    }
}

/// Turns a raw command value into what the charger expects. First matching rule wins:
/// forced str, boolean literal or forced bool, integer literal or forced int,
/// decimal literal or forced float, field mapping, and finally plain text.
pub fn coerce(raw: &RawValue, force: Option<ForceType>) -> Result<Value> {
    let text = raw.as_text();

    if force == Some(ForceType::Str) {
        return Ok(Value::String(text));
    }

    let lower = text.to_lowercase();
    if lower == "true" || lower == "false" || force == Some(ForceType::Bool) {
        return match lower.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(coercion_error(text, "bool")),
        };
    }

    if matches!(raw, RawValue::Int(_))
        || is_integer_literal(&text)
        || force == Some(ForceType::Int)
    {
        return to_int(raw, text).map(Value::Number);
    }

    if matches!(raw, RawValue::Float(_))
        || is_decimal_literal(&text)
        || force == Some(ForceType::Float)
    {
        let value = to_float(raw, &text)?;
        return Number::from_f64(value)
            .map(Value::Number)
            .ok_or_else(|| coercion_error(text, "float"));
    }

    if let RawValue::Fields(fields) = raw {
        return Ok(Value::Object(fields.clone()));
    }

    Ok(Value::String(text))
}

fn coercion_error(value: String, target: &'static str) -> GlueError {
    GlueError::Coercion { value, target }
}

fn is_integer_literal(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

fn is_decimal_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    match unsigned.split_once('.') {
        Some((whole, fraction)) => is_integer_literal(whole) && is_integer_literal(fraction),
        None => false,
    }
}

/// Integers are not limited to `i64`: larger ones become `u64`, and beyond that
/// the nearest float JSON can carry.
fn to_int(raw: &RawValue, text: String) -> Result<Number> {
    match raw {
        RawValue::Int(value) => Ok(Number::from(*value)),
        RawValue::Float(value) if value.is_finite() => {
            let whole = value.trunc();
            if whole >= i64::MIN as f64 && whole < i64::MAX as f64 {
                Ok(Number::from(whole as i64))
            } else {
                Number::from_f64(whole).ok_or_else(|| coercion_error(text, "int"))
            }
        }
        _ => parse_int(text.trim()).ok_or_else(|| coercion_error(text, "int")),
    }
}

fn parse_int(text: &str) -> Option<Number> {
    if let Ok(value) = text.parse::<i64>() {
        return Some(Number::from(value));
    }
    if let Ok(value) = text.parse::<u64>() {
        return Some(Number::from(value));
    }
    let digits = text.strip_prefix('-').unwrap_or(text);
    if is_integer_literal(digits) {
        return text.parse::<Number>().ok();
    }
    None
}

fn to_float(raw: &RawValue, text: &str) -> Result<f64> {
    match raw {
        RawValue::Float(value) => Ok(*value),
        RawValue::Int(value) => Ok(*value as f64),
        _ => text.trim().parse().map_err(|_| coercion_error(text.to_string(), "float")),
    }
}
