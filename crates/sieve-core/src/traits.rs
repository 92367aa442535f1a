//! Trait seams of the validation stage.
//!
//! - `RowValidator` : the pure, per-row decision (trusted, CPU-only)
//! - `RowSource`    : where rows come from (I/O boundary)
//! - `PartitionSink`: where the two partitions go (I/O boundary)
//!
//! The batch runner only ever talks to these traits, so the core never
//! touches a file, a socket, or a database.

use sieve_contracts::{
    error::SieveResult,
    outcome::ValidationOutcome,
    row::Row,
    rule::RuleSet,
};

use crate::runner::BatchResult;

/// Decides the outcome of a single row.
///
/// Implementations must be deterministic and free of shared mutable state:
/// the batch runner may call `validate` concurrently from several workers.
pub trait RowValidator: Send + Sync {
    fn validate(&self, row: &Row) -> ValidationOutcome;
}

impl<T: RowValidator + ?Sized> RowValidator for &T {
    fn validate(&self, row: &Row) -> ValidationOutcome {
        (**self).validate(row)
    }
}

/// A finite source of input rows.
pub trait RowSource {
    /// Column names in input order.
    fn columns(&self) -> &[String];

    /// Read every remaining row, in input order.
    fn read_rows(&mut self) -> SieveResult<Vec<Row>>;
}

/// Persists the accepted and rejected partitions of a finished batch.
pub trait PartitionSink {
    /// Whatever the sink wants to hand back (paths written, row counts, ...).
    type Receipt;

    /// Write both partitions.  Both must be emitted even when empty.
    ///
    /// `input_columns` is the source's column list, needed to lay out the
    /// rejected partition and the pass-through part of the accepted one.
    fn write_partitions(
        &mut self,
        rules: &RuleSet,
        input_columns: &[String],
        result: &BatchResult,
    ) -> SieveResult<Self::Receipt>;
}
