//! CSV row source.
//!
//! Reads a headered CSV file into `Row`s.  Every cell is kept as text; empty
//! cells become `None`.  Short records are padded with `None`; a record with
//! more cells than the header is an input error.
//!
//! Repeated header names are renamed `name.1`, `name.2`, ... so every cell
//! keeps its own key.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use sieve_contracts::{
    error::{SieveError, SieveResult},
    row::Row,
};
use sieve_core::traits::RowSource;

/// A `RowSource` over any CSV byte stream with a header record.
pub struct CsvRowSource<R: Read> {
    reader: csv::Reader<R>,
    columns: Vec<String>,
}

fn input_error(message: impl std::fmt::Display) -> SieveError {
    SieveError::InputError {
        reason: message.to_string(),
    }
}

impl CsvRowSource<File> {
    /// Open the CSV file at `path`.
    ///
    /// Returns `SieveError::InputError` if the file cannot be opened or its
    /// header record cannot be read.
    pub fn from_path(path: &Path) -> SieveResult<Self> {
        let file = File::open(path).map_err(|e| {
            input_error(format!("failed to open input file '{}': {}", path.display(), e))
        })?;
        Self::from_reader(file)
    }
}

impl<R: Read> CsvRowSource<R> {
    pub fn from_reader(reader: R) -> SieveResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let header = reader
            .headers()
            .map_err(|e| input_error(format!("failed to read CSV header: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();
        Ok(Self {
            reader,
            columns: dedupe_columns(header),
        })
    }
}

/// Rename repeated column names to `name.1`, `name.2`, ... in header order,
/// skipping suffixes already taken by another column.
pub fn dedupe_columns(header: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(header.len());
    let mut out = Vec::with_capacity(header.len());
    for name in header {
        if seen.insert(name.clone()) {
            out.push(name);
            continue;
        }
        let mut n = 1;
        let renamed = loop {
            let candidate = format!("{name}.{n}");
            if !seen.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        warn!(column = %name, renamed = %renamed, "repeated CSV column renamed");
        seen.insert(renamed.clone());
        out.push(renamed);
    }
    out
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn read_rows(&mut self) -> SieveResult<Vec<Row>> {
        let mut rows = Vec::new();
        for (index, record) in self.reader.records().enumerate() {
            let record = record
                .map_err(|e| input_error(format!("failed to read CSV record {}: {}", index + 1, e)))?;
            if record.len() > self.columns.len() {
                return Err(input_error(format!(
                    "CSV record {} has {} fields, header has {}",
                    index + 1,
                    record.len(),
                    self.columns.len()
                )));
            }
            let row: Row = self
                .columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let value = record.get(i).filter(|s| !s.is_empty()).map(str::to_string);
                    (column.clone(), value)
                })
                .collect();
            rows.push(row);
        }
        debug!(rows = rows.len(), columns = self.columns.len(), "input rows read");
        Ok(rows)
    }
}
