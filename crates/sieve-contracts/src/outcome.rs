//! Per-row validation outcomes and batch-level summaries.
//!
//! `ValidationOutcome` is what the row validator returns for one row.
//! `BatchSummary` is what the batch runner reports for a whole run.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::row::{ResolvedRow, Row};

/// Why a required field aborted its row.
///
/// Each variant maps to one suffix of the discard reason string.  The
/// classification is stable and is what downstream tooling groups on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectKind {
    /// The raw value could not be coerced to the rule's type.
    TypeInvalid,
    /// The coerced value's text form exceeds `max_length`.
    TooLong { actual: usize, max: usize },
    /// The coerced value's text form does not match the rule's pattern.
    RegexMismatch,
    /// The coerced value's text form is not in `allowed_values`.
    NotAllowed,
    /// The validator itself failed on this row.  Isolated to the row.
    Internal,
}

impl RejectKind {
    /// Short label used as the histogram key in batch summaries.
    pub fn label(&self) -> &'static str {
        match self {
            RejectKind::TypeInvalid => "type_invalid",
            RejectKind::TooLong { .. } => "too_long",
            RejectKind::RegexMismatch => "regex_mismatch",
            RejectKind::NotAllowed => "not_allowed",
            RejectKind::Internal => "internal_error",
        }
    }
}

/// The single classified reason attached to a rejected row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectReason {
    /// The rule-set field that failed.
    pub field: String,
    pub kind: RejectKind,
}

impl RejectReason {
    pub fn new(field: impl Into<String>, kind: RejectKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

impl fmt::Display for RejectReason {
    /// Renders the `discard_reason` column value, e.g. `title_too_long (66>65)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RejectKind::TooLong { actual, max } => {
                write!(f, "{}_too_long ({}>{})", self.field, actual, max)
            }
            kind => write!(f, "{}_{}", self.field, kind.label()),
        }
    }
}

/// A rejected row: the untouched input plus its reason.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    pub original: Row,
    pub reason: RejectReason,
}

/// The result of validating one row.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Every required field resolved.  Optional failures are already nulled.
    Accepted(ResolvedRow),
    /// A required field failed; scanning stopped at that field.
    Rejected(RejectedRow),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    /// The discard reason, if this row was rejected.
    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            ValidationOutcome::Accepted(_) => None,
            ValidationOutcome::Rejected(r) => Some(&r.reason),
        }
    }
}

/// Aggregate counts for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Rejections per `RejectKind::label()`, sorted by label.
    pub reasons: BTreeMap<String, usize>,
}

impl BatchSummary {
    /// Fold one outcome into the running totals.
    pub fn record(&mut self, outcome: &ValidationOutcome) {
        self.total += 1;
        match outcome.reason() {
            None => self.accepted += 1,
            Some(reason) => {
                self.rejected += 1;
                *self
                    .reasons
                    .entry(reason.kind.label().to_string())
                    .or_insert(0) += 1;
            }
        }
    }
}
