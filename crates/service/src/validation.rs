//! Schema validation for request documents.
//!
//! A [`Schema`] lists the fields a document may carry. Validation is not
//! fail-fast: every violation is collected, logged at debug level, and the
//! caller only sees an opaque [`ServiceError::Validation`].

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Non-empty unless `allow_empty`; length counted in UTF-16 code units.
    String { max_len: usize, allow_empty: bool },
    Integer { min: i64, max: i64 },
    Boolean,
    /// ISO-8601 date or date-time; with `min_now` it must not lie in the past.
    IsoDate { min_now: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
}

impl FieldRule {
    pub const fn string(name: &'static str, max_len: usize) -> Self {
        Self::of(name, FieldKind::String { max_len, allow_empty: false })
    }

    /// String that may also be `""`.
    pub const fn text(name: &'static str, max_len: usize) -> Self {
        Self::of(name, FieldKind::String { max_len, allow_empty: true })
    }

    pub const fn integer(name: &'static str, min: i64, max: i64) -> Self {
        Self::of(name, FieldKind::Integer { min, max })
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::of(name, FieldKind::Boolean)
    }

    pub const fn future_date(name: &'static str) -> Self {
        Self::of(name, FieldKind::IsoDate { min_now: true })
    }

    const fn of(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: false, nullable: false }
    }

    pub const fn required(self) -> Self {
        Self { required: true, ..self }
    }

    /// Accept an explicit `null`.
    pub const fn nullable(self) -> Self {
        Self { nullable: true, ..self }
    }
}

/// Closed set of fields; keys not listed are rejected.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    fields: &'static [FieldRule],
}

impl Schema {
    pub const fn new(fields: &'static [FieldRule]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FieldRule] {
        self.fields
    }

    fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|r| r.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self { field: field.to_string(), message: message.into() }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" {}", self.field, self.message)
    }
}

/// Validate `doc` and return the coerced field map, or every violation found.
pub fn check(schema: &Schema, doc: &Value, now: DateTime<Utc>) -> Result<Map<String, Value>, Vec<Violation>> {
    let Value::Object(input) = doc else {
        return Err(vec![Violation::new("value", "must be an object")]);
    };

    let mut violations = Vec::new();
    for key in input.keys() {
        if schema.rule(key).is_none() {
            violations.push(Violation::new(key, "is not allowed"));
        }
    }

    let mut output = Map::new();
    for rule in schema.fields() {
        match input.get(rule.name) {
            None if rule.required => violations.push(Violation::new(rule.name, "is required")),
            None => {}
            Some(Value::Null) if rule.nullable && !rule.required => {
                output.insert(rule.name.to_string(), Value::Null);
            }
            Some(value) => match check_value(rule, value, now) {
                Ok(coerced) => {
                    output.insert(rule.name.to_string(), coerced);
                }
                Err(message) => violations.push(Violation::new(rule.name, message)),
            },
        }
    }

    if violations.is_empty() { Ok(output) } else { Err(violations) }
}

fn check_value(rule: &FieldRule, value: &Value, now: DateTime<Utc>) -> Result<Value, String> {
    match rule.kind {
        FieldKind::String { max_len, allow_empty } => {
            let Value::String(s) = value else { return Err("must be a string".into()) };
            if s.is_empty() && !allow_empty {
                return Err("is not allowed to be empty".into());
            }
            if s.encode_utf16().count() > max_len {
                return Err(format!("length must be less than or equal to {max_len} characters long"));
            }
            Ok(value.clone())
        }
        FieldKind::Integer { min, max } => {
            let int = match value {
                Value::Number(n) => integral(n),
                Value::String(s) => integral_str(s).ok_or_else(|| "must be a number".to_string())?,
                _ => return Err("must be a number".into()),
            }
            .ok_or_else(|| "must be an integer".to_string())?;
            if int < min {
                return Err(format!("must be greater than or equal to {min}"));
            }
            if int > max {
                return Err(format!("must be less than or equal to {max}"));
            }
            Ok(Value::from(int))
        }
        FieldKind::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            _ => Err("must be a boolean".into()),
        },
        FieldKind::IsoDate { min_now } => {
            let Value::String(s) = value else { return Err("must be in ISO 8601 date format".into()) };
            let at = parse_iso8601(s).ok_or_else(|| "must be in ISO 8601 date format".to_string())?;
            if min_now && at < now {
                return Err("must be greater than or equal to \"now\"".into());
            }
            // stored as sent; only the check uses the parsed instant
            Ok(value.clone())
        }
    }
}

fn integral(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 { Some(f as i64) } else { None }
}

/// Numeric string: `Some(None)` when it is a number but not integral.
fn integral_str(s: &str) -> Option<Option<i64>> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(Some(i));
    }
    let n = s.parse::<f64>().ok().filter(|f| f.is_finite())?;
    Number::from_f64(n).map(|n| integral(&n))
}

/// Parse an ISO-8601 date or date-time. Offset-less values are read as UTC.
pub fn parse_iso8601(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Validate against the current time, logging violations on failure.
pub fn assert_valid(schema: &Schema, doc: &Value) -> Result<Map<String, Value>, ServiceError> {
    check(schema, doc, Utc::now()).map_err(|violations| {
        let detail = violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
        debug!(count = violations.len(), %detail, "request validation failed");
        ServiceError::validation_failed()
    })
}
