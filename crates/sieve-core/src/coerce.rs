//! Type coercers.
//!
//! Each coercer maps a raw textual value to a typed value without panicking
//! or raising.  The result encodes the `(ok, value)` pair as:
//!
//! - `Ok(None)`      : ok, null (absent or empty input)
//! - `Ok(Some(v))`   : ok, coerced value
//! - `Err(CoerceError)`: the text is not a valid value of the type
//!
//! All coercers are pure: no clock, no locale, no shared state.

use std::fmt;

use chrono::format::{self, ParseErrorKind, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use sieve_contracts::{
    rule::{FieldType, Rule},
    value::FieldValue,
};

/// Returned when a non-null raw value cannot be coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoerceError {
    pub target: FieldType,
}

impl fmt::Display for CoerceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value is not a valid {}", self.target.as_str())
    }
}

impl std::error::Error for CoerceError {}

pub type Coercion = Result<Option<FieldValue>, CoerceError>;

const TRUTHY: [&str; 5] = ["true", "1", "yes", "y", "t"];
const FALSY: [&str; 5] = ["false", "0", "no", "n", "f"];

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

/// Coerce `raw` with the coercer matching `rule.field_type`.
pub fn coerce(rule: &Rule, raw: Option<&str>) -> Coercion {
    match rule.field_type {
        FieldType::String => coerce_string(raw),
        FieldType::Integer => coerce_integer(raw),
        FieldType::Boolean => coerce_boolean(raw),
        FieldType::Date => coerce_date(raw, &rule.date_formats),
    }
}

/// Never fails.  The text is kept verbatim, surrounding whitespace included.
pub fn coerce_string(raw: Option<&str>) -> Coercion {
    Ok(non_empty(raw).map(|s| FieldValue::Text(s.to_string())))
}

/// Base-10 signed 64-bit integer.  Surrounding whitespace is ignored; a
/// leading `+` or `-` is accepted; decimals and out-of-range values fail.
pub fn coerce_integer(raw: Option<&str>) -> Coercion {
    let Some(s) = non_empty(raw) else {
        return Ok(None);
    };
    s.trim()
        .parse::<i64>()
        .map(|n| Some(FieldValue::Integer(n)))
        .map_err(|_| CoerceError {
            target: FieldType::Integer,
        })
}

/// Case-insensitive literal sets; see `TRUTHY` and `FALSY`.
pub fn coerce_boolean(raw: Option<&str>) -> Coercion {
    let Some(s) = non_empty(raw) else {
        return Ok(None);
    };
    let normalized = s.trim().to_lowercase();
    if TRUTHY.contains(&normalized.as_str()) {
        Ok(Some(FieldValue::Boolean(true)))
    } else if FALSY.contains(&normalized.as_str()) {
        Ok(Some(FieldValue::Boolean(false)))
    } else {
        Err(CoerceError {
            target: FieldType::Boolean,
        })
    }
}

/// Try each pattern in order; the first one that parses the whole trimmed
/// string wins.  Only the calendar date is kept.
pub fn coerce_date(raw: Option<&str>, formats: &[String]) -> Coercion {
    let Some(s) = non_empty(raw) else {
        return Ok(None);
    };
    let trimmed = s.trim();
    formats
        .iter()
        .find_map(|fmt| parse_date_with(trimmed, fmt))
        .map(|d| Some(FieldValue::Date(d)))
        .ok_or(CoerceError {
            target: FieldType::Date,
        })
}

/// A pattern may describe a date, a date-time, a zoned date-time, or a
/// date without day (or month) fields.
fn parse_date_with(s: &str, fmt: &str) -> Option<NaiveDate> {
    let partial = match NaiveDate::parse_from_str(s, fmt) {
        Ok(date) => return Some(date),
        Err(e) => e.kind() == ParseErrorKind::NotEnough,
    };
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
        return Some(dt.date_naive());
    }
    if partial {
        return parse_partial_date(s, fmt);
    }
    None
}

/// Missing month and day default to 1, so `%Y-%m` reads `2024-03` as
/// 2024-03-01 and `%Y` reads `2024` as 2024-01-01.
fn parse_partial_date(s: &str, fmt: &str) -> Option<NaiveDate> {
    let mut parsed = Parsed::new();
    format::parse(&mut parsed, s, StrftimeItems::new(fmt)).ok()?;
    // Fails, leaving the parsed value, when the field was already parsed.
    let _ = parsed.set_month(1);
    let _ = parsed.set_day(1);
    parsed.to_naive_date().ok()
}
