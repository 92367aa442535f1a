//! Run-level error types for the SIEVE validation stage.
//!
//! Only configuration and I/O problems are errors.  A row that fails
//! validation is a normal `ValidationOutcome::Rejected` value, never an `Err`.

use thiserror::Error;

/// The unified error type for the SIEVE workspace.
#[derive(Debug, Error)]
pub enum SieveError {
    /// The rule document is missing, unreadable, malformed, or contains a
    /// rule that cannot be compiled (bad regex, zero `max_length`, ...).
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The input row source is missing or cannot be decoded.
    #[error("input error: {reason}")]
    InputError { reason: String },

    /// A partition artifact could not be written.
    #[error("output error: {reason}")]
    OutputError { reason: String },

    /// The run report could not be built, written, or read back.
    #[error("run report error: {reason}")]
    ReportError { reason: String },
}

impl SieveError {
    /// The message without its category prefix.
    pub fn reason(&self) -> &str {
        match self {
            SieveError::ConfigError { reason }
            | SieveError::InputError { reason }
            | SieveError::OutputError { reason }
            | SieveError::ReportError { reason } => reason,
        }
    }
}

/// Convenience alias used throughout the SIEVE crates.
pub type SieveResult<T> = Result<T, SieveError>;
