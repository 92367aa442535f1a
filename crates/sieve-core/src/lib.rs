//! # sieve-core
//!
//! The deterministic, schema-driven validation engine for SIEVE.
//!
//! This crate provides:
//! - The four type coercers (`coerce`)
//! - The field validator (`field`) and row validator (`row`)
//! - The `BatchRunner` that partitions a batch into accepted and rejected rows
//! - The trait seams (`RowValidator`, `RowSource`, `PartitionSink`) that keep
//!   all I/O outside the core
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sieve_core::BatchRunner;
//!
//! let rules = sieve_rules::from_file(path)?;
//! let result = BatchRunner::new(&rules).run(&rows);
//! println!("{} accepted, {} rejected", result.summary.accepted, result.summary.rejected);
//! ```

pub mod coerce;
pub mod field;
pub mod row;
pub mod runner;
pub mod traits;

pub use field::{validate_field, FieldVerdict};
pub use row::validate_row;
pub use runner::{BatchResult, BatchRunner};
pub use traits::{PartitionSink, RowSource, RowValidator};

// ── Tests ─────────────────────────────────────────────────────────────────────
