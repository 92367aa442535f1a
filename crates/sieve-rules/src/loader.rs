//! Rule document loader.
//!
//! Parses a YAML or TOML document into a `RuleDocument` and compiles it into
//! a typed, ordered `RuleSet`.
//!
//! Compilation algorithm, per field in declaration order:
//!
//! 1. Resolve the type tag.  Unknown tags fall back to `string` with a
//!    warning; they never fail the load.
//! 2. `max_length` must be a positive integer.
//! 3. `regex` is compiled once, anchored at the start of the input.  An
//!    empty pattern means "no pattern".
//! 4. `allowed_values` literals are rendered to text once.  An empty list
//!    means "no allow-list".
//! 5. `formats` must be non-empty when given; absent means `["%Y-%m-%d"]`.

use std::path::Path;

use regex::Regex;
use tracing::{debug, info, warn};

use sieve_contracts::{
    error::{SieveError, SieveResult},
    rule::{FieldType, Rule, RuleSet, DEFAULT_DATE_FORMAT},
};

use crate::document::{RawRule, RuleDocument};

/// The serialization format of a rule document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFormat {
    Yaml,
    Toml,
}

impl RuleFormat {
    /// Pick a format from the file extension.  Anything that is not `.toml`
    /// is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => RuleFormat::Toml,
            _ => RuleFormat::Yaml,
        }
    }
}

/// Parse `s` as a YAML rule document and compile it.
///
/// Returns `SieveError::ConfigError` if the YAML is malformed, does not match
/// the `RuleDocument` schema, or contains a rule that cannot be compiled.
pub fn from_yaml_str(s: &str) -> SieveResult<RuleSet> {
    let doc: RuleDocument = serde_yaml::from_str(s).map_err(|e| SieveError::ConfigError {
        reason: format!("failed to parse rules YAML: {}", e),
    })?;
    compile(doc)
}

/// Parse `s` as a TOML rule document and compile it.
pub fn from_toml_str(s: &str) -> SieveResult<RuleSet> {
    let doc: RuleDocument = toml::from_str(s).map_err(|e| SieveError::ConfigError {
        reason: format!("failed to parse rules TOML: {}", e),
    })?;
    compile(doc)
}

/// Parse `s` in the given format and compile it.
pub fn from_str(s: &str, format: RuleFormat) -> SieveResult<RuleSet> {
    match format {
        RuleFormat::Yaml => from_yaml_str(s),
        RuleFormat::Toml => from_toml_str(s),
    }
}

/// Read the file at `path` and load it as a rule document.
///
/// The format is chosen from the extension (see `RuleFormat::from_path`).
pub fn from_file(path: &Path) -> SieveResult<RuleSet> {
    let contents = std::fs::read_to_string(path).map_err(|e| SieveError::ConfigError {
        reason: format!("failed to read rules file '{}': {}", path.display(), e),
    })?;
    let rules = from_str(&contents, RuleFormat::from_path(path))?;
    info!(
        path = %path.display(),
        field_count = rules.len(),
        "rule set loaded"
    );
    Ok(rules)
}

/// Compile an already-deserialized document into a `RuleSet`.
pub fn compile(doc: RuleDocument) -> SieveResult<RuleSet> {
    let fields = doc.fields.unwrap_or_default();
    let mut compiled = Vec::with_capacity(fields.len());
    for (name, raw) in fields {
        let rule = compile_rule(&name, raw)?;
        debug!(
            field = %name,
            field_type = rule.field_type.as_str(),
            required = rule.required,
            "rule compiled"
        );
        compiled.push((name, rule));
    }
    Ok(RuleSet::new(compiled))
}

fn rule_error(field: &str, message: impl std::fmt::Display) -> SieveError {
    SieveError::ConfigError {
        reason: format!("invalid rule for field '{}': {}", field, message),
    }
}

fn compile_rule(field: &str, raw: RawRule) -> SieveResult<Rule> {
    let field_type = match FieldType::from_tag(&raw.field_type) {
        Some(t) => t,
        None => {
            // Permissive: an unknown tag validates as a plain string.
            warn!(
                field = %field,
                tag = %raw.field_type,
                "unrecognized field type; falling back to string"
            );
            FieldType::String
        }
    };

    let max_length = match raw.max_length {
        None => None,
        Some(n) if n >= 1 => Some(n as usize),
        Some(n) => return Err(rule_error(field, format!("max_length must be positive, got {n}"))),
    };

    let pattern = match raw.regex.as_deref() {
        None | Some("") => None,
        Some(p) => Some(
            Regex::new(&format!(r"\A(?:{p})"))
                .map_err(|e| rule_error(field, format!("regex '{p}' does not compile: {e}")))?,
        ),
    };

    let allowed_values = match raw.allowed_values {
        Some(values) if !values.is_empty() => {
            Some(values.iter().map(ToString::to_string).collect::<Vec<_>>())
        }
        _ => None,
    };

    let date_formats = match raw.formats {
        None => vec![DEFAULT_DATE_FORMAT.to_string()],
        Some(formats) if formats.is_empty() => {
            return Err(rule_error(field, "formats must list at least one pattern"));
        }
        Some(formats) => formats,
    };

    Ok(Rule {
        field_type,
        required: raw.required,
        max_length,
        pattern,
        allowed_values,
        date_formats,
    })
}
