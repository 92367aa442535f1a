//! Typed field values produced by coercion.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A raw value after successful coercion.
///
/// Null is modelled as `Option::None` around this type, never as a variant.
/// Constraint checks (`max_length`, `regex`, `allowed_values`) all operate on
/// the `Display` text form, so the rendering below is part of the contract:
///
/// | variant   | text form          |
/// |-----------|--------------------|
/// | `Text`    | the string as-is   |
/// | `Integer` | base-10 digits     |
/// | `Boolean` | `true` / `false`   |
/// | `Date`    | `YYYY-MM-DD`       |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Date(NaiveDate),
}

impl FieldValue {
    /// The text form used for constraint checks and tabular output.
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Boolean(b) => write!(f, "{b}"),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}
