//! # sieve-rules
//!
//! Loads the declarative rule document that drives the SIEVE validator.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! let rules = sieve_rules::from_file(Path::new("configs/validation_rules.yaml"))?;
//! // Pass `&rules` to `sieve_core::BatchRunner::new(...)`.
//! ```
//!
//! ## Document shape
//!
//! Field rules live under a top-level `fields` map.  Map order is
//! validation order, for YAML and TOML alike.  Malformed documents and
//! uncompilable rules are configuration errors raised here, never at
//! row-validation time.

pub mod document;
pub mod loader;

pub use document::{Literal, RawRule, RuleDocument};
pub use loader::{compile, from_file, from_str, from_toml_str, from_yaml_str, RuleFormat};

// ── Tests ─────────────────────────────────────────────────────────────────────
