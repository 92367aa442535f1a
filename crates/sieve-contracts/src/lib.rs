//! # sieve-contracts
//!
//! Shared types, rule definitions, and error contracts for the SIEVE
//! validation stage.
//!
//! All crates in the workspace import from here. No validation logic lives
//! in this crate, only data definitions and error types.

pub mod error;
pub mod outcome;
pub mod row;
pub mod rule;
pub mod value;

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use error::SieveError;
    use outcome::{BatchSummary, RejectKind, RejectReason, RejectedRow, ValidationOutcome};
    use row::{raw_value, row_from_pairs, ResolvedRow, Row};
    use rule::{FieldType, Rule, RuleSet};
    use value::FieldValue;

    // ── RejectReason rendering ───────────────────────────────────────────────

    #[test]
    fn reason_type_invalid_renders_field_suffix() {
        let reason = RejectReason::new("created_at", RejectKind::TypeInvalid);
        assert_eq!(reason.to_string(), "created_at_type_invalid");
    }

    #[test]
    fn reason_too_long_renders_lengths() {
        let reason = RejectReason::new("title", RejectKind::TooLong { actual: 66, max: 65 });
        assert_eq!(reason.to_string(), "title_too_long (66>65)");
    }

    #[test]
    fn reason_regex_and_allow_list_render() {
        assert_eq!(
            RejectReason::new("external_link", RejectKind::RegexMismatch).to_string(),
            "external_link_regex_mismatch"
        );
        assert_eq!(
            RejectReason::new("rtype_id", RejectKind::NotAllowed).to_string(),
            "rtype_id_not_allowed"
        );
        assert_eq!(
            RejectReason::new("title", RejectKind::Internal).to_string(),
            "title_internal_error"
        );
    }

    // ── FieldValue text form ─────────────────────────────────────────────────

    #[test]
    fn field_value_text_forms() {
        assert_eq!(FieldValue::Text("a b".into()).text(), "a b");
        assert_eq!(FieldValue::Integer(-15).text(), "-15");
        assert_eq!(FieldValue::Boolean(true).text(), "true");
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(FieldValue::Date(date).text(), "2024-01-05");
    }

    #[test]
    fn field_value_serializes_tagged() {
        let json = serde_json::to_value(FieldValue::Integer(14)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "integer", "value": 14 }));
    }

    // ── Row helpers ──────────────────────────────────────────────────────────

    #[test]
    fn raw_value_treats_empty_and_absent_as_null() {
        let row = row_from_pairs([("a", Some("x")), ("b", Some("")), ("c", None)]);
        assert_eq!(raw_value(&row, "a"), Some("x"));
        assert_eq!(raw_value(&row, "b"), None);
        assert_eq!(raw_value(&row, "c"), None);
        assert_eq!(raw_value(&row, "missing"), None);
    }

    #[test]
    fn row_preserves_insertion_order() {
        let row = row_from_pairs([("z", Some("1")), ("a", Some("2")), ("m", None)]);
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    // ── RuleSet ──────────────────────────────────────────────────────────────

    #[test]
    fn rule_set_keeps_declaration_order() {
        let rules = RuleSet::new(vec![
            ("title".to_string(), Rule::new(FieldType::String)),
            ("rtype_id".to_string(), Rule::new(FieldType::Integer)),
            ("created_at".to_string(), Rule::new(FieldType::Date)),
        ]);
        assert_eq!(rules.field_names(), vec!["title", "rtype_id", "created_at"]);
        assert_eq!(rules.len(), 3);
        assert!(rules.contains("rtype_id"));
        assert!(!rules.contains("summary"));
    }

    #[test]
    fn rule_set_duplicate_field_replaces_in_place() {
        let rules = RuleSet::new(vec![
            ("a".to_string(), Rule::new(FieldType::String)),
            ("b".to_string(), Rule::new(FieldType::String)),
            ("a".to_string(), Rule::new(FieldType::Integer).required(true)),
        ]);
        assert_eq!(rules.field_names(), vec!["a", "b"]);
        let a = rules.get("a").unwrap();
        assert_eq!(a.field_type, FieldType::Integer);
        assert!(a.required);
    }

    #[test]
    fn field_type_tags() {
        assert_eq!(FieldType::from_tag("date"), Some(FieldType::Date));
        assert_eq!(FieldType::from_tag("decimal"), None);
        assert_eq!(FieldType::Boolean.as_str(), "boolean");
    }

    // ── BatchSummary ─────────────────────────────────────────────────────────

    #[test]
    fn summary_counts_and_histogram() {
        let mut summary = BatchSummary::default();
        summary.record(&ValidationOutcome::Accepted(ResolvedRow::new()));
        for kind in [RejectKind::NotAllowed, RejectKind::NotAllowed, RejectKind::TypeInvalid] {
            summary.record(&ValidationOutcome::Rejected(RejectedRow {
                original: Row::new(),
                reason: RejectReason::new("f", kind),
            }));
        }
        assert_eq!(summary.total, 4);
        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.rejected, 3);
        assert_eq!(summary.reasons.get("not_allowed"), Some(&2));
        assert_eq!(summary.reasons.get("type_invalid"), Some(&1));
    }

    // ── SieveError display messages ──────────────────────────────────────────

    #[test]
    fn error_display_messages() {
        let err = SieveError::ConfigError {
            reason: "rules file not found".to_string(),
        };
        assert!(err.to_string().contains("configuration error"));
        assert!(err.to_string().contains("rules file not found"));

        let err = SieveError::OutputError {
            reason: "disk full".to_string(),
        };
        assert!(err.to_string().contains("output error"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn error_reason_drops_category_prefix() {
        let err = SieveError::InputError {
            reason: "input file not found: in.csv".to_string(),
        };
        assert_eq!(err.to_string(), "input error: input file not found: in.csv");
        assert_eq!(err.reason(), "input file not found: in.csv");
    }
}
