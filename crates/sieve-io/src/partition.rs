//! CSV partition writer.
//!
//! Writes `valid.csv` and `discarded.csv` into one output directory.  Both
//! files are always written, header included, even when their partition is
//! empty.
//!
//! Column layout:
//!
//! - accepted: rule-set fields in rule order, then pass-through columns in
//!   input order.  With no accepted rows the header is the rule-set fields
//!   alone.
//! - rejected: input columns in input order, then `discard_reason`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use sieve_contracts::{
    error::{SieveError, SieveResult},
    rule::RuleSet,
};
use sieve_core::{runner::BatchResult, traits::PartitionSink};

pub const ACCEPTED_FILE: &str = "valid.csv";
pub const REJECTED_FILE: &str = "discarded.csv";
pub const DISCARD_REASON_COLUMN: &str = "discard_reason";

/// What `CsvPartitionWriter` wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPartitions {
    pub accepted_path: PathBuf,
    pub rejected_path: PathBuf,
    pub accepted_rows: usize,
    pub rejected_rows: usize,
}

/// Header of the accepted partition.
pub fn accepted_header(rules: &RuleSet, input_columns: &[String], result: &BatchResult) -> Vec<String> {
    let mut header = rules.field_names();
    if result.accepted.is_empty() {
        return header;
    }
    for column in input_columns {
        if !header.contains(column) {
            header.push(column.clone());
        }
    }
    // Sources that are not column-shaped may carry keys no header announced.
    for row in &result.accepted {
        for key in row.keys() {
            if !header.contains(key) {
                header.push(key.clone());
            }
        }
    }
    header
}

/// Header of the rejected partition.
pub fn rejected_header(input_columns: &[String]) -> Vec<String> {
    let mut header = input_columns.to_vec();
    header.push(DISCARD_REASON_COLUMN.to_string());
    header
}

fn output_error(path: &Path, e: impl std::fmt::Display) -> SieveError {
    SieveError::OutputError {
        reason: format!("failed to write '{}': {}", path.display(), e),
    }
}

/// A `PartitionSink` writing CSV files into `dir`.
pub struct CsvPartitionWriter {
    dir: PathBuf,
}

impl CsvPartitionWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn accepted_path(&self) -> PathBuf {
        self.dir.join(ACCEPTED_FILE)
    }

    pub fn rejected_path(&self) -> PathBuf {
        self.dir.join(REJECTED_FILE)
    }

    fn write_table<I>(path: &Path, header: &[String], records: I) -> SieveResult<usize>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut writer = csv::Writer::from_path(path).map_err(|e| output_error(path, e))?;
        writer.write_record(header).map_err(|e| output_error(path, e))?;
        let mut count = 0;
        for record in records {
            writer.write_record(&record).map_err(|e| output_error(path, e))?;
            count += 1;
        }
        writer.flush().map_err(|e| output_error(path, e))?;
        Ok(count)
    }
}

impl PartitionSink for CsvPartitionWriter {
    type Receipt = WrittenPartitions;

    fn write_partitions(
        &mut self,
        rules: &RuleSet,
        input_columns: &[String],
        result: &BatchResult,
    ) -> SieveResult<WrittenPartitions> {
        fs::create_dir_all(&self.dir).map_err(|e| output_error(&self.dir, e))?;

        let accepted_path = self.accepted_path();
        let header = accepted_header(rules, input_columns, result);
        let accepted_rows = Self::write_table(
            &accepted_path,
            &header,
            result.accepted.iter().map(|row| {
                header
                    .iter()
                    .map(|h| row.get(h).and_then(Option::as_ref).map(|v| v.text()).unwrap_or_default())
                    .collect()
            }),
        )?;

        let rejected_path = self.rejected_path();
        let header = rejected_header(input_columns);
        let rejected_rows = Self::write_table(
            &rejected_path,
            &header,
            result.rejected.iter().map(|rejected| {
                let mut record: Vec<String> = input_columns
                    .iter()
                    .map(|c| rejected.original.get(c).cloned().flatten().unwrap_or_default())
                    .collect();
                record.push(rejected.reason.to_string());
                record
            }),
        )?;

        info!(
            accepted = %accepted_path.display(),
            rejected = %rejected_path.display(),
            accepted_rows,
            rejected_rows,
            "partitions written"
        );

        Ok(WrittenPartitions {
            accepted_path,
            rejected_path,
            accepted_rows,
            rejected_rows,
        })
    }
}
