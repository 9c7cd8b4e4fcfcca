//! Single-pass column statistics over a delimited file.
//!
//! The profiling pass reads every data row once and folds each cell into a
//! per-column [`ColumnProfile`]. The accumulated profiles are consumed exactly
//! once by the type resolver; after the pass finishes nothing mutates them.

use std::path::Path;

use encoding_rs::Encoding;
use log::info;

use crate::{error::ImportError, identifier::normalize_identifier, io_utils};

/// Diagnostic sample values retained per column. Never consulted by type
/// resolution.
const SAMPLE_LIMIT: usize = 100;

/// Accumulated statistics for one column across all rows of a file.
///
/// `is_numeric` starts true and monotonically becomes false the first time a
/// non-empty cell fails to parse as a number; it never reverts. A column that
/// receives no non-empty values keeps its initial state
/// (`is_numeric = true, max_length = 0`).
#[derive(Debug, Clone)]
pub struct ColumnProfile {
    pub raw_name: String,
    pub name: String,
    pub max_length: usize,
    pub is_numeric: bool,
    pub has_decimal: bool,
    samples: Vec<String>,
}

impl ColumnProfile {
    fn new(raw_name: &str) -> Self {
        Self {
            raw_name: raw_name.to_string(),
            name: normalize_identifier(raw_name),
            max_length: 0,
            is_numeric: true,
            has_decimal: false,
            samples: Vec::new(),
        }
    }

    fn observe(&mut self, value: &str) {
        self.max_length = self.max_length.max(value.chars().count());
        if value.is_empty() {
            return;
        }
        if self.samples.len() < SAMPLE_LIMIT {
            self.samples.push(value.to_string());
        }
        if self.is_numeric {
            if value.trim().parse::<f64>().is_ok() {
                self.has_decimal = self.has_decimal || value.contains('.');
            } else {
                self.is_numeric = false;
            }
        }
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }
}

/// All column profiles for one file, in original header order.
#[derive(Debug)]
pub struct FileProfile {
    columns: Vec<ColumnProfile>,
    rows_scanned: u64,
}

impl FileProfile {
    pub fn new(headers: &[String]) -> Self {
        Self {
            columns: headers
                .iter()
                .map(|raw| ColumnProfile::new(raw))
                .collect(),
            rows_scanned: 0,
        }
    }

    /// Folds one data row into the profiles. Cells align positionally with
    /// the header order.
    pub fn observe_row(&mut self, cells: &[String]) {
        for (column, cell) in self.columns.iter_mut().zip(cells) {
            column.observe(cell);
        }
        self.rows_scanned += 1;
    }

    pub fn columns(&self) -> &[ColumnProfile] {
        &self.columns
    }

    pub fn rows_scanned(&self) -> u64 {
        self.rows_scanned
    }
}

/// First pass over a file: reads the header row and every data row, returning
/// the finished profile.
pub fn profile_file(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<FileProfile, ImportError> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let mut profile = FileProfile::new(&headers);

    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        let cells = io_utils::decode_record(&record, encoding)?;
        profile.observe_row(&cells);
    }
    info!(
        "Profiled {} data row(s) across {} column(s) in {}",
        profile.rows_scanned,
        profile.columns.len(),
        path.display()
    );
    Ok(profile)
}
