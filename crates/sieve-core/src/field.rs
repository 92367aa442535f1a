//! The field validator: one rule applied to one raw value.
//!
//! Checks run in a fixed order and the first failure ends evaluation for
//! the field:
//!
//!   coerce → max_length → pattern → allowed_values
//!
//! A failure on a required field is fatal to the row.  A failure on an
//! optional field nulls the field and nothing else.  A null coerced value
//! skips every constraint.

use tracing::debug;

use sieve_contracts::{
    outcome::{RejectKind, RejectReason},
    rule::Rule,
    value::FieldValue,
};

use crate::coerce::coerce;

/// What the field validator decided for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldVerdict {
    /// Write this value (possibly null) into the working row and continue.
    Resolved(Option<FieldValue>),
    /// Abort the row with this reason.
    Fatal(RejectReason),
}

/// Route a failed check according to the rule's required/optional policy.
fn fail(field: &str, rule: &Rule, kind: RejectKind) -> FieldVerdict {
    if rule.required {
        debug!(field = %field, reason = kind.label(), "required field failed");
        FieldVerdict::Fatal(RejectReason::new(field, kind))
    } else {
        debug!(field = %field, reason = kind.label(), "optional field degraded to null");
        FieldVerdict::Resolved(None)
    }
}

/// Validate `raw` for `field` against `rule`.
pub fn validate_field(field: &str, rule: &Rule, raw: Option<&str>) -> FieldVerdict {
    let value = match coerce(rule, raw) {
        Ok(Some(v)) => v,
        Ok(None) => return FieldVerdict::Resolved(None),
        Err(_) => return fail(field, rule, RejectKind::TypeInvalid),
    };

    let text = value.text();

    if let Some(max) = rule.max_length {
        let actual = text.chars().count();
        if actual > max {
            return fail(field, rule, RejectKind::TooLong { actual, max });
        }
    }

    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(&text) {
            return fail(field, rule, RejectKind::RegexMismatch);
        }
    }

    if let Some(allowed) = &rule.allowed_values {
        if !allowed.iter().any(|a| *a == text) {
            return fail(field, rule, RejectKind::NotAllowed);
        }
    }

    FieldVerdict::Resolved(Some(value))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use regex::Regex;
    use sieve_contracts::rule::FieldType;

    use super::*;

    fn prefix(p: &str) -> Regex {
        Regex::new(&format!(r"\A(?:{p})")).unwrap()
    }

    fn fatal(field: &str, kind: RejectKind) -> FieldVerdict {
        FieldVerdict::Fatal(RejectReason::new(field, kind))
    }

    // ── coercion failures ─────────────────────────────────────────────────────

    #[test]
    fn required_type_invalid_is_fatal() {
        let rule = Rule::new(FieldType::Integer).required(true);
        assert_eq!(
            validate_field("rtype_id", &rule, Some("abc")),
            fatal("rtype_id", RejectKind::TypeInvalid)
        );
    }

    #[test]
    fn optional_type_invalid_degrades_to_null() {
        let rule = Rule::new(FieldType::Boolean);
        assert_eq!(
            validate_field("is_active", &rule, Some("maybe")),
            FieldVerdict::Resolved(None)
        );
    }

    #[test]
    fn null_value_skips_constraints_even_when_required() {
        let rule = Rule::new(FieldType::String)
            .required(true)
            .max_length(1)
            .pattern(prefix("x"))
            .allowed_values(["x"]);
        assert_eq!(validate_field("title", &rule, None), FieldVerdict::Resolved(None));
        assert_eq!(validate_field("title", &rule, Some("")), FieldVerdict::Resolved(None));
    }

    // ── max_length ────────────────────────────────────────────────────────────

    #[test]
    fn length_boundary() {
        let rule = Rule::new(FieldType::String).required(true).max_length(65);
        let exact = "a".repeat(65);
        assert_eq!(
            validate_field("title", &rule, Some(&exact)),
            FieldVerdict::Resolved(Some(FieldValue::Text(exact.clone())))
        );

        let over = "a".repeat(66);
        let verdict = validate_field("title", &rule, Some(&over));
        match verdict {
            FieldVerdict::Fatal(reason) => assert_eq!(reason.to_string(), "title_too_long (66>65)"),
            other => panic!("expected Fatal, got {:?}", other),
        }
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let rule = Rule::new(FieldType::String).required(true).max_length(10);
        // 10 characters, 12 bytes.
        let text = "Resolución";
        assert!(matches!(
            validate_field("title", &rule, Some(text)),
            FieldVerdict::Resolved(Some(_))
        ));
    }

    #[test]
    fn length_applies_to_coerced_text_form() {
        let rule = Rule::new(FieldType::Integer).required(true).max_length(2);
        // "+7" coerces to 7, whose text form is one character.
        assert_eq!(
            validate_field("n", &rule, Some("+7")),
            FieldVerdict::Resolved(Some(FieldValue::Integer(7)))
        );
        assert_eq!(
            validate_field("n", &rule, Some("100")),
            fatal("n", RejectKind::TooLong { actual: 3, max: 2 })
        );
    }

    #[test]
    fn optional_too_long_degrades_to_null() {
        let rule = Rule::new(FieldType::String).max_length(3);
        assert_eq!(validate_field("summary", &rule, Some("abcd")), FieldVerdict::Resolved(None));
    }

    // ── pattern ───────────────────────────────────────────────────────────────

    #[test]
    fn pattern_is_prefix_match() {
        let rule = Rule::new(FieldType::String).required(true).pattern(prefix("https?://"));
        assert!(matches!(
            validate_field("external_link", &rule, Some("https://www.ani.gov.co/doc.pdf")),
            FieldVerdict::Resolved(Some(_))
        ));
        assert_eq!(
            validate_field("external_link", &rule, Some("ftp://host/https://")),
            fatal("external_link", RejectKind::RegexMismatch)
        );
    }

    #[test]
    fn pattern_runs_on_date_text_form() {
        let rule = Rule::new(FieldType::Date)
            .required(true)
            .date_formats(["%d/%m/%Y"])
            .pattern(prefix("2024-"));
        assert_eq!(
            validate_field("created_at", &rule, Some("05/01/2024")),
            FieldVerdict::Resolved(Some(FieldValue::Date(
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
            )))
        );
    }

    // ── allowed_values ────────────────────────────────────────────────────────

    #[test]
    fn allow_list_compares_text_forms() {
        let rule = Rule::new(FieldType::Integer).required(true).allowed_values(["14", "15"]);
        assert_eq!(
            validate_field("rtype_id", &rule, Some("13")),
            fatal("rtype_id", RejectKind::NotAllowed)
        );
        assert_eq!(
            validate_field("rtype_id", &rule, Some("15")),
            FieldVerdict::Resolved(Some(FieldValue::Integer(15)))
        );
        assert_eq!(
            validate_field("rtype_id", &rule, Some(" 014 ")),
            FieldVerdict::Resolved(Some(FieldValue::Integer(14)))
        );
    }

    #[test]
    fn optional_not_allowed_degrades_to_null() {
        let rule = Rule::new(FieldType::String).allowed_values(["Decreto", "Resolución"]);
        assert_eq!(validate_field("gtype", &rule, Some("Circular")), FieldVerdict::Resolved(None));
    }

    // ── check order ───────────────────────────────────────────────────────────

    #[test]
    fn first_failing_check_decides_reason() {
        // Fails length, pattern, and allow-list; only length is reported.
        let rule = Rule::new(FieldType::String)
            .required(true)
            .max_length(2)
            .pattern(prefix("z"))
            .allowed_values(["q"]);
        assert_eq!(
            validate_field("f", &rule, Some("abc")),
            fatal("f", RejectKind::TooLong { actual: 3, max: 2 })
        );

        // Passes length, fails pattern and allow-list; pattern is reported.
        let rule = Rule::new(FieldType::String)
            .required(true)
            .max_length(5)
            .pattern(prefix("z"))
            .allowed_values(["q"]);
        assert_eq!(
            validate_field("f", &rule, Some("abc")),
            fatal("f", RejectKind::RegexMismatch)
        );
    }
}
