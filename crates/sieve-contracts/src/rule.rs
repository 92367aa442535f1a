//! Compiled rule types.
//!
//! A `RuleSet` is built once per run by `sieve-rules` and shared read-only
//! by every worker.  Everything in here is `Send + Sync` and immutable after
//! construction.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The date pattern applied when a `date` rule declares no `formats`.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// The four coercion kinds a rule can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Boolean,
    Date,
}

impl FieldType {
    /// Map a document type tag to a `FieldType`.
    ///
    /// Returns `None` for unrecognized tags; the loader decides what to do
    /// with those.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(FieldType::String),
            "integer" => Some(FieldType::Integer),
            "boolean" => Some(FieldType::Boolean),
            "date" => Some(FieldType::Date),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
        }
    }
}

/// One compiled schema entry.
#[derive(Debug, Clone)]
pub struct Rule {
    pub field_type: FieldType,
    pub required: bool,
    /// Maximum length of the coerced value's text form, in characters.
    pub max_length: Option<usize>,
    /// Pattern already anchored at the start of the input (`\A(?:...)`).
    pub pattern: Option<Regex>,
    /// Allowed literals, pre-rendered to their text form.
    pub allowed_values: Option<Vec<String>>,
    /// Date patterns tried in order.  Only consulted for `FieldType::Date`.
    pub date_formats: Vec<String>,
}

impl Rule {
    /// An optional rule of the given type with no constraints.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            max_length: None,
            pattern: None,
            allowed_values: None,
            date_formats: vec![DEFAULT_DATE_FORMAT.to_string()],
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_formats = formats.into_iter().map(Into::into).collect();
        self
    }
}

/// The ordered, immutable rule set for one run.
///
/// Iteration order is declaration order and is part of the validation
/// contract: the first required field to fail decides the discard reason.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<(String, Rule)>,
}

impl RuleSet {
    /// Build a rule set from ordered `(field, rule)` pairs.
    ///
    /// A later entry for an already-present field replaces the earlier rule
    /// but keeps the original position.
    pub fn new<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = (String, Rule)>,
    {
        let mut out: Vec<(String, Rule)> = Vec::new();
        for (name, rule) in rules {
            match out.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = rule,
                None => out.push((name, rule)),
            }
        }
        Self { rules: out }
    }

    /// Iterate `(field, rule)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<String> {
        self.rules.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn get(&self, field: &str) -> Option<&Rule> {
        self.rules.iter().find(|(n, _)| n == field).map(|(_, r)| r)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
