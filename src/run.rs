//! Run orchestration: file selection and per-run aggregation.
//!
//! Two entry points with deliberately different failure semantics:
//! [`import_named_file`] propagates any failure unchanged, while
//! [`sweep_directory`] logs a failing file and continues with the rest. The
//! asymmetry is intentional; callers pick the policy by picking the entry
//! point.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use encoding_rs::Encoding;
use glob::glob;
use itertools::Itertools;
use log::{error, info, warn};
use serde::Serialize;

use crate::{
    config::{DbConfig, TableMapping},
    error::ImportError,
    importer::Importer,
    io_utils,
};

/// Aggregated result of one run, possibly spanning several files. Returned to
/// the caller and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ImportRun {
    pub total_imported: u64,
    pub processed_files: Vec<String>,
    pub elapsed_seconds: f64,
}

/// Everything an orchestrated run needs; borrowed for the duration of one
/// invocation.
pub struct RunSettings<'a> {
    pub data_dir: &'a Path,
    pub mapping: &'a TableMapping,
    pub db: &'a DbConfig,
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
    pub commit_every: usize,
}

/// Imports exactly one named file from the data directory. The file must
/// exist and its name must match a mapping fragment; both checks fail before
/// any database interaction. Failures propagate unchanged.
pub fn import_named_file(
    settings: &RunSettings<'_>,
    file_name: &str,
) -> Result<ImportRun, ImportError> {
    ensure_data_dir(settings.data_dir)?;
    let path = settings.data_dir.join(file_name);
    if !path.is_file() {
        return Err(ImportError::Config(format!(
            "file '{file_name}' not found in {}",
            settings.data_dir.display()
        )));
    }
    let Some(table) = settings.mapping.resolve(file_name) else {
        return Err(ImportError::Config(format!(
            "file '{file_name}' does not match any mapped file type (known fragments: {})",
            settings.mapping.fragments().join(", ")
        )));
    };

    let started = Instant::now();
    let imported = import_one(settings, &path, table)?;
    info!("Successfully processed {file_name}: {imported} record(s)");
    Ok(ImportRun {
        total_imported: imported,
        processed_files: vec![file_name.to_string()],
        elapsed_seconds: started.elapsed().as_secs_f64(),
    })
}

/// Discovers every delimited file in the data directory and imports each one
/// that matches the mapping. A per-file failure is logged and that file is
/// skipped; the sweep continues. Partial success is expected and visible in
/// `processed_files`.
pub fn sweep_directory(settings: &RunSettings<'_>) -> Result<ImportRun, ImportError> {
    ensure_data_dir(settings.data_dir)?;
    let started = Instant::now();
    let mut total_imported: u64 = 0;
    let mut processed_files = Vec::new();

    for path in candidate_files(settings.data_dir)? {
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let Some(table) = settings.mapping.resolve(file_name) else {
            continue;
        };
        match import_one(settings, &path, table) {
            Ok(imported) => {
                total_imported += imported;
                processed_files.push(file_name.to_string());
                info!("Successfully processed {file_name}: {imported} record(s)");
            }
            Err(err) => {
                error!("Error processing {file_name}: {err}");
            }
        }
    }

    if processed_files.is_empty() {
        warn!("No matching delimited files found for processing");
    } else {
        info!("Processing summary:");
        info!("Total files processed: {}", processed_files.len());
        info!("Total records imported: {total_imported}");
        info!("Processed files: {}", processed_files.iter().join(", "));
    }

    Ok(ImportRun {
        total_imported,
        processed_files,
        elapsed_seconds: started.elapsed().as_secs_f64(),
    })
}

fn import_one(
    settings: &RunSettings<'_>,
    path: &Path,
    table: &str,
) -> Result<u64, ImportError> {
    let delimiter = io_utils::resolve_input_delimiter(path, settings.delimiter);
    let mut importer = Importer::connect(settings.db, table, settings.commit_every)?;
    importer.import_file(path, delimiter, settings.encoding)
}

fn ensure_data_dir(data_dir: &Path) -> Result<(), ImportError> {
    if data_dir.is_dir() {
        Ok(())
    } else {
        Err(ImportError::Config(format!(
            "data directory {} not found",
            data_dir.display()
        )))
    }
}

fn candidate_files(data_dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    let mut files = Vec::new();
    for extension in ["csv", "tsv"] {
        let pattern = data_dir.join(format!("*.{extension}"));
        let pattern = pattern.to_str().ok_or_else(|| {
            ImportError::Config(format!(
                "data directory path {} is not valid UTF-8",
                data_dir.display()
            ))
        })?;
        let paths = glob(pattern)
            .map_err(|err| ImportError::Config(format!("invalid glob '{pattern}': {err}")))?;
        for entry in paths {
            match entry {
                Ok(path) => files.push(path),
                Err(err) => error!("Skipping unreadable directory entry: {err}"),
            }
        }
    }
    files.sort();
    Ok(files)
}
