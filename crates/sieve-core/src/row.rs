//! The row validator.
//!
//! A row is scanned against the rule set in declaration order.  The scan has
//! two states:
//!
//! - **Scanning**: the next rule's field is validated; a resolved value is
//!   recorded and scanning continues.
//! - **Done**: either a required field failed (`Rejected`, nothing after it
//!   is evaluated) or every rule resolved (`Accepted`).
//!
//! Fields the rule set does not mention are copied through untouched.

use tracing::debug;

use sieve_contracts::{
    outcome::{RejectedRow, ValidationOutcome},
    row::{raw_value, ResolvedRow, Row},
    rule::RuleSet,
    value::FieldValue,
};

use crate::{
    field::{validate_field, FieldVerdict},
    traits::RowValidator,
};

/// Validate one row against `rules`.
///
/// The accepted row lists rule-set fields first, in rule order, followed by
/// pass-through fields in input order.
pub fn validate_row(rules: &RuleSet, row: &Row) -> ValidationOutcome {
    let mut resolved: Vec<(&str, Option<FieldValue>)> = Vec::with_capacity(rules.len());

    for (field, rule) in rules.iter() {
        match validate_field(field, rule, raw_value(row, field)) {
            FieldVerdict::Resolved(value) => resolved.push((field, value)),
            FieldVerdict::Fatal(reason) => {
                debug!(reason = %reason, "row rejected");
                return ValidationOutcome::Rejected(RejectedRow {
                    original: row.clone(),
                    reason,
                });
            }
        }
    }

    let mut out = ResolvedRow::with_capacity(row.len().max(rules.len()));
    for (field, value) in resolved {
        out.insert(field.to_string(), value);
    }
    for (field, value) in row {
        if !rules.contains(field) {
            out.insert(field.clone(), value.clone().map(FieldValue::Text));
        }
    }
    ValidationOutcome::Accepted(out)
}

impl RowValidator for RuleSet {
    fn validate(&self, row: &Row) -> ValidationOutcome {
        validate_row(self, row)
    }
}

#[cfg(test)]
mod tests {
    use sieve_contracts::{
        outcome::RejectKind,
        row::row_from_pairs,
        rule::{FieldType, Rule},
    };

    use super::*;

    fn rules(entries: Vec<(&str, Rule)>) -> RuleSet {
        RuleSet::new(entries.into_iter().map(|(n, r)| (n.to_string(), r)))
    }

    fn accepted(outcome: ValidationOutcome) -> ResolvedRow {
        match outcome {
            ValidationOutcome::Accepted(row) => row,
            other => panic!("expected Accepted, got {:?}", other),
        }
    }

    fn rejected(outcome: ValidationOutcome) -> RejectedRow {
        match outcome {
            ValidationOutcome::Rejected(row) => row,
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    // ── short-circuit ─────────────────────────────────────────────────────────

    /// With two required, invalid fields, only the first one in rule order
    /// may name the reason.
    #[test]
    fn first_required_failure_wins() {
        let set = rules(vec![
            ("a", Rule::new(FieldType::Integer).required(true)),
            ("b", Rule::new(FieldType::Integer).required(true)),
        ]);
        let row = row_from_pairs([("b", Some("x")), ("a", Some("y"))]);
        let r = rejected(validate_row(&set, &row));
        assert_eq!(r.reason.to_string(), "a_type_invalid");
    }

    #[test]
    fn rule_order_not_row_order_decides() {
        let set = rules(vec![
            ("b", Rule::new(FieldType::Integer).required(true)),
            ("a", Rule::new(FieldType::Integer).required(true)),
        ]);
        let row = row_from_pairs([("a", Some("y")), ("b", Some("x"))]);
        assert_eq!(rejected(validate_row(&set, &row)).reason.field, "b");
    }

    #[test]
    fn rejected_row_keeps_original_values() {
        let set = rules(vec![
            ("title", Rule::new(FieldType::String).required(true)),
            ("rtype_id", Rule::new(FieldType::Integer).required(true)),
        ]);
        let row = row_from_pairs([
            ("title", Some("  padded  ")),
            ("rtype_id", Some("fourteen")),
            ("entity", Some("ANI")),
            ("summary", None),
        ]);
        let r = rejected(validate_row(&set, &row));
        assert_eq!(r.original, row);
        assert_eq!(r.reason.kind, RejectKind::TypeInvalid);
    }

    // ── accepted rows ─────────────────────────────────────────────────────────

    #[test]
    fn optional_null_field_is_accepted_as_null() {
        let set = rules(vec![("summary", Rule::new(FieldType::String))]);
        let row = row_from_pairs([("summary", None)]);
        let out = accepted(validate_row(&set, &row));
        assert_eq!(out.get("summary"), Some(&None));
    }

    #[test]
    fn every_rule_field_present_even_when_absent_from_input() {
        let set = rules(vec![
            ("title", Rule::new(FieldType::String)),
            ("update_at", Rule::new(FieldType::Date)),
        ]);
        let row = row_from_pairs([("title", Some("Decreto 1"))]);
        let out = accepted(validate_row(&set, &row));
        assert_eq!(out.len(), 2);
        assert_eq!(out.get("update_at"), Some(&None));
    }

    #[test]
    fn pass_through_fields_copied_after_rule_fields() {
        let set = rules(vec![
            ("rtype_id", Rule::new(FieldType::Integer)),
            ("title", Rule::new(FieldType::String)),
        ]);
        let row = row_from_pairs([
            ("entity", Some("Agencia Nacional de Infraestructura")),
            ("title", Some("Resolución 5")),
            ("gtype", None),
            ("rtype_id", Some("15")),
        ]);
        let out = accepted(validate_row(&set, &row));
        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["rtype_id", "title", "entity", "gtype"]);
        assert_eq!(out["rtype_id"], Some(FieldValue::Integer(15)));
        assert_eq!(
            out["entity"],
            Some(FieldValue::Text("Agencia Nacional de Infraestructura".into()))
        );
        assert_eq!(out["gtype"], None);
    }

    #[test]
    fn optional_failures_null_out_without_rejecting() {
        let set = rules(vec![
            ("is_active", Rule::new(FieldType::Boolean)),
            ("classification_id", Rule::new(FieldType::Integer)),
        ]);
        let row = row_from_pairs([("is_active", Some("maybe")), ("classification_id", Some("1.5"))]);
        let out = accepted(validate_row(&set, &row));
        assert_eq!(out["is_active"], None);
        assert_eq!(out["classification_id"], None);
    }

    #[test]
    fn empty_rule_set_accepts_row_unchanged() {
        let set = RuleSet::default();
        let row = row_from_pairs([("x", Some("1")), ("y", None)]);
        let out = accepted(validate_row(&set, &row));
        assert_eq!(out["x"], Some(FieldValue::Text("1".into())));
        assert_eq!(out["y"], None);
    }

    // ── determinism ───────────────────────────────────────────────────────────

    #[test]
    fn validating_twice_is_identical() {
        let set = rules(vec![
            ("title", Rule::new(FieldType::String).required(true).max_length(5)),
            ("created_at", Rule::new(FieldType::Date).date_formats(["%d/%m/%Y"])),
        ]);
        for row in [
            row_from_pairs([("title", Some("short")), ("created_at", Some("01/02/2023"))]),
            row_from_pairs([("title", Some("too long")), ("created_at", Some("x"))]),
        ] {
            assert_eq!(validate_row(&set, &row), validate_row(&set, &row));
        }
    }

    #[test]
    fn rule_set_implements_row_validator() {
        let set = rules(vec![("n", Rule::new(FieldType::Integer).required(true))]);
        let validator: &dyn RowValidator = &set;
        assert!(!validator.validate(&row_from_pairs([("n", Some("x"))])).is_accepted());
    }
}
