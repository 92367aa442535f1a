//! The batch runner: validate many rows, partition the outcomes.
//!
//! The runner owns a `RowValidator` and enforces the batch-level guarantees:
//!
//! 1. Every input row lands in exactly one partition.
//! 2. Each partition keeps input order (stable partition, not a sort).
//! 3. A panic while validating one row rejects that row only; the rest of
//!    the batch is unaffected.
//! 4. Parallel and sequential runs produce identical results.
//!
//! Parallel mode splits the input into contiguous chunks, validates each
//! chunk on a scoped thread into its own buffer, and concatenates the
//! buffers in chunk order.  No locks are taken; the validator is shared by
//! reference and must be `Sync`.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;

use tracing::{debug, error, info};

use sieve_contracts::{
    error::SieveResult,
    outcome::{BatchSummary, RejectKind, RejectReason, RejectedRow, ValidationOutcome},
    row::{ResolvedRow, Row},
};

use crate::traits::{RowSource, RowValidator};

/// Field name reported when the validator itself fails on a row.
pub const INTERNAL_FAILURE_FIELD: &str = "row";

/// The partitioned result of one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub accepted: Vec<ResolvedRow>,
    pub rejected: Vec<RejectedRow>,
    pub summary: BatchSummary,
}

impl BatchResult {
    /// Fold outcomes, in input order, into the two partitions.
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = ValidationOutcome>,
    {
        let mut result = BatchResult::default();
        for outcome in outcomes {
            result.summary.record(&outcome);
            match outcome {
                ValidationOutcome::Accepted(row) => result.accepted.push(row),
                ValidationOutcome::Rejected(row) => result.rejected.push(row),
            }
        }
        result
    }
}

/// Drives a `RowValidator` over a batch of rows.
///
/// ```rust,ignore
/// let rules = sieve_rules::from_file(path)?;
/// let result = BatchRunner::new(&rules).with_workers(4).run(&rows);
/// ```
pub struct BatchRunner<V> {
    validator: V,
    workers: usize,
}

impl<V: RowValidator> BatchRunner<V> {
    /// A sequential runner.
    pub fn new(validator: V) -> Self {
        Self {
            validator,
            workers: 1,
        }
    }

    /// Validate on up to `workers` threads.  Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Validate `rows` and partition the outcomes.
    pub fn run(&self, rows: &[Row]) -> BatchResult {
        debug!(rows = rows.len(), workers = self.workers, "batch starting");
        let result = BatchResult::from_outcomes(self.validate_all(rows));
        info!(
            total = result.summary.total,
            accepted = result.summary.accepted,
            rejected = result.summary.rejected,
            "batch complete"
        );
        result
    }

    /// Drain `source` and validate everything it yields.
    ///
    /// Only reading the source can fail; validation itself never does.
    pub fn run_source(&self, source: &mut dyn RowSource) -> SieveResult<BatchResult> {
        let rows = source.read_rows()?;
        Ok(self.run(&rows))
    }

    fn validate_all(&self, rows: &[Row]) -> Vec<ValidationOutcome> {
        if self.workers <= 1 || rows.len() < 2 {
            return self.validate_chunk(0, rows);
        }

        let chunk_len = rows.len().div_ceil(self.workers);
        thread::scope(|scope| {
            let handles: Vec<_> = rows
                .chunks(chunk_len)
                .enumerate()
                .map(|(n, chunk)| {
                    let offset = n * chunk_len;
                    let handle = scope.spawn(move || self.validate_chunk(offset, chunk));
                    (offset, chunk, handle)
                })
                .collect();

            let mut outcomes = Vec::with_capacity(rows.len());
            for (offset, chunk, handle) in handles {
                match handle.join() {
                    Ok(buffer) => outcomes.extend(buffer),
                    // Rows are individually guarded, so a dead worker means
                    // something outside validation failed; redo it inline.
                    Err(_) => {
                        error!(offset, "validation worker died; revalidating its chunk");
                        outcomes.extend(self.validate_chunk(offset, chunk));
                    }
                }
            }
            outcomes
        })
    }

    fn validate_chunk(&self, offset: usize, rows: &[Row]) -> Vec<ValidationOutcome> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| self.validate_isolated(offset + i, row))
            .collect()
    }

    /// Validate one row, converting a panic into a rejection of that row.
    fn validate_isolated(&self, index: usize, row: &Row) -> ValidationOutcome {
        match catch_unwind(AssertUnwindSafe(|| self.validator.validate(row))) {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(row = index, "row validation panicked; rejecting row");
                ValidationOutcome::Rejected(RejectedRow {
                    original: row.clone(),
                    reason: RejectReason::new(INTERNAL_FAILURE_FIELD, RejectKind::Internal),
                })
            }
        }
    }
}
