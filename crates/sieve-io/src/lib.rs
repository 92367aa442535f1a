//! # sieve-io
//!
//! File boundary of the SIEVE validation stage.
//!
//! - [`CsvRowSource`] implements [`RowSource`](sieve_core::traits::RowSource)
//!   over a headered CSV file.
//! - [`CsvPartitionWriter`] implements
//!   [`PartitionSink`](sieve_core::traits::PartitionSink) and writes
//!   `valid.csv` / `discarded.csv`.
//!
//! Nothing in here validates anything; it only moves rows between files and
//! the core.

pub mod partition;
pub mod source;

pub use partition::{
    accepted_header, rejected_header, CsvPartitionWriter, WrittenPartitions, ACCEPTED_FILE,
    DISCARD_REASON_COLUMN, REJECTED_FILE,
};
pub use source::{dedupe_columns, CsvRowSource};

// ── Tests ─────────────────────────────────────────────────────────────────────
