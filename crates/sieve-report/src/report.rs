//! Run report types.
//!
//! `RunRecorder` is created when a run starts and sealed into a `RunReport`
//! once the partitions are on disk.  The report is the hand-off document for
//! the persistence stage: it says what was validated, with which rules, and
//! pins every artifact by digest.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use sieve_contracts::{
    error::{SieveError, SieveResult},
    outcome::BatchSummary,
};

use crate::digest::digest_file;

/// File name of the report inside the output directory.
pub const REPORT_FILE: &str = "run_report.json";

/// Unique identifier for one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

/// One output file pinned by digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDigest {
    pub path: PathBuf,
    /// Data rows in the artifact, header excluded.
    pub rows: usize,
    /// Lowercase hex SHA-256 of the file bytes.
    pub sha256: String,
}

/// The sealed record of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub input: PathBuf,
    pub rules: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: BatchSummary,
    /// Accepted partition first, rejected partition second.
    pub artifacts: Vec<ArtifactDigest>,
}

/// Collects run metadata from start to finish.
#[derive(Debug, Clone)]
pub struct RunRecorder {
    run_id: RunId,
    input: PathBuf,
    rules: PathBuf,
    started_at: DateTime<Utc>,
}

impl RunRecorder {
    /// Start recording a run over `input` validated with `rules`.
    pub fn start(input: impl Into<PathBuf>, rules: impl Into<PathBuf>) -> Self {
        Self {
            run_id: RunId::new(),
            input: input.into(),
            rules: rules.into(),
            started_at: Utc::now(),
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Seal the run: digest each `(path, rows)` artifact and stamp the
    /// finish time.
    pub fn finish(self, summary: BatchSummary, artifacts: &[(PathBuf, usize)]) -> SieveResult<RunReport> {
        let artifacts = artifacts
            .iter()
            .map(|(path, rows)| {
                Ok(ArtifactDigest {
                    path: path.clone(),
                    rows: *rows,
                    sha256: digest_file(path)?,
                })
            })
            .collect::<SieveResult<Vec<_>>>()?;

        Ok(RunReport {
            run_id: self.run_id,
            input: self.input,
            rules: self.rules,
            started_at: self.started_at,
            finished_at: Utc::now(),
            summary,
            artifacts,
        })
    }
}

impl RunReport {
    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> SieveResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| SieveError::ReportError {
            reason: format!("failed to serialize run report: {}", e),
        })?;
        fs::write(path, json).map_err(|e| SieveError::ReportError {
            reason: format!("failed to write run report '{}': {}", path.display(), e),
        })?;
        info!(
            run_id = %self.run_id.0,
            path = %path.display(),
            "run report written"
        );
        Ok(())
    }

    /// Read a report previously written by `write_json`.
    pub fn read_json(path: &Path) -> SieveResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| SieveError::ReportError {
            reason: format!("failed to read run report '{}': {}", path.display(), e),
        })?;
        serde_json::from_str(&contents).map_err(|e| SieveError::ReportError {
            reason: format!("failed to parse run report '{}': {}", path.display(), e),
        })
    }

    /// Recompute every artifact digest and compare with the recorded one.
    ///
    /// Returns `Ok(false)` on the first mismatch.  A missing artifact is an
    /// error, not a mismatch.
    pub fn verify_artifacts(&self) -> SieveResult<bool> {
        for artifact in &self.artifacts {
            let actual = digest_file(&artifact.path)?;
            if actual != artifact.sha256 {
                warn!(
                    run_id = %self.run_id.0,
                    path = %artifact.path.display(),
                    expected = %artifact.sha256,
                    actual = %actual,
                    "artifact digest mismatch"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }
}
