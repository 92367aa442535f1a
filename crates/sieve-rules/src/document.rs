//! Untyped rule document schema.
//!
//! A `RuleDocument` is deserialized from YAML or TOML and holds an ordered
//! map of `RawRule`s under the top-level `fields` key.  Nothing here is
//! trusted: the loader compiles every entry into a typed `Rule` and rejects
//! the whole document on the first malformed entry.
//!
//! Example in YAML:
//! ```yaml
//! fields:
//!   title:
//!     type: string
//!     required: true
//!     max_length: 65
//!   rtype_id:
//!     type: integer
//!     required: true
//!     allowed_values: [14, 15]
//!   created_at:
//!     type: date
//!     required: true
//!     formats: ["%Y-%m-%d", "%d/%m/%Y"]
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

fn default_type() -> String {
    "string".to_string()
}

/// A single rule entry as written in the document.
///
/// Unknown keys are rejected so a misspelled constraint (`max_lenght`)
/// surfaces at load time instead of being silently ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRule {
    /// Type tag.  Recognized: `string`, `integer`, `boolean`, `date`.
    #[serde(rename = "type", default = "default_type")]
    pub field_type: String,

    #[serde(default)]
    pub required: bool,

    /// Signed so that a negative value reaches the loader and is reported
    /// as a rule error rather than a generic parse error.
    pub max_length: Option<i64>,

    /// Prefix-matched regular expression.
    pub regex: Option<String>,

    pub allowed_values: Option<Vec<Literal>>,

    /// Date patterns, tried in order.  Only used when `type = "date"`.
    pub formats: Option<Vec<String>>,
}

/// A literal in an `allowed_values` list.
///
/// Literals are compared by text form against the coerced value, so
/// `[14, 15]` and `["14", "15"]` are equivalent for an integer field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Integer(n) => write!(f, "{n}"),
            // Integral floats keep one decimal: `14.0` never equals `14`.
            Literal::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Literal::Float(x) => write!(f, "{x}"),
            Literal::Text(s) => f.write_str(s),
        }
    }
}

/// The top-level structure deserialized from a rule document.
///
/// Other top-level keys are ignored so rule files can carry metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleDocument {
    /// Ordered field map.  Declaration order is validation order.
    #[serde(default)]
    pub fields: Option<IndexMap<String, RawRule>>,
}
