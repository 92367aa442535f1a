//! # sieve-report
//!
//! Optional run report for the SIEVE validation stage.
//!
//! A report records the run id, timestamps, the batch summary, and a
//! SHA-256 digest for each partition file.  Downstream loaders call
//! [`RunReport::verify_artifacts`] before ingesting, so a partition edited
//! or truncated after the run is caught.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sieve_report::RunRecorder;
//!
//! let recorder = RunRecorder::start(&input, &rules_path);
//! // ... validate and write partitions ...
//! let report = recorder.finish(result.summary.clone(), &[(accepted, n), (rejected, m)])?;
//! report.write_json(&out_dir.join(sieve_report::REPORT_FILE))?;
//! ```

pub mod digest;
pub mod report;

pub use digest::{digest_bytes, digest_file};
pub use report::{ArtifactDigest, RunId, RunRecorder, RunReport, REPORT_FILE};

// ── Tests ─────────────────────────────────────────────────────────────────────
