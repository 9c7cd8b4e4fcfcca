//! Per-file import against one exclusively owned database session.
//!
//! Each import reads the file twice: a profiling pass that feeds the type
//! resolver, then a row pass that applies one prepared upsert per row inside
//! checkpointed transactions. Rows committed at a checkpoint stay committed;
//! a failure mid-batch rolls back only the open tail.

use std::path::Path;

use encoding_rs::Encoding;
use log::{error, info};
use postgres::{Client, NoTls, types::ToSql};

use crate::{config::DbConfig, error::ImportError, io_utils, profile, resolve, sql};

/// Rows applied between checkpoint commits.
pub const DEFAULT_COMMIT_INTERVAL: usize = 1000;

pub struct Importer {
    client: Client,
    table: String,
    commit_every: u64,
}

impl Importer {
    /// Opens a database session for one import invocation. Connection
    /// failures are fatal; there is no retry at this layer.
    pub fn connect(db: &DbConfig, table: &str, commit_every: usize) -> Result<Self, ImportError> {
        let mut config = postgres::Config::new();
        config
            .host(&db.host)
            .port(db.port)
            .dbname(&db.dbname)
            .user(&db.user)
            .password(&db.password);
        let client = config.connect(NoTls).map_err(ImportError::Connectivity)?;
        Ok(Self {
            client,
            table: table.to_string(),
            commit_every: commit_every.max(1) as u64,
        })
    }

    /// Imports one file into the target table and returns the number of rows
    /// applied. Row processing is strictly sequential; the only durability
    /// points are the checkpoint commits.
    pub fn import_file(
        &mut self,
        path: &Path,
        delimiter: u8,
        encoding: &'static Encoding,
    ) -> Result<u64, ImportError> {
        info!(
            "Processing file: {} (delimiter '{}')",
            path.display(),
            io_utils::printable_delimiter(delimiter)
        );

        let profile = profile::profile_file(path, delimiter, encoding)?;
        let schema = resolve::resolve_schema(&profile)?;

        let ddl = sql::create_table_sql(&self.table, &schema);
        self.client
            .batch_execute(&ddl)
            .map_err(|source| ImportError::Schema {
                table: self.table.clone(),
                source,
            })?;
        info!("Table structure created/verified: {}", self.table);

        let upsert = sql::upsert_sql(&self.table, &schema);
        let statement = self
            .client
            .prepare(&upsert)
            .map_err(|source| ImportError::Schema {
                table: self.table.clone(),
                source,
            })?;

        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
        let mut record = csv::ByteRecord::new();
        let mut imported: u64 = 0;
        let mut tx = self.client.transaction().map_err(ImportError::Commit)?;

        while reader.read_byte_record(&mut record)? {
            let line = record
                .position()
                .map(|position| position.line())
                .unwrap_or(imported + 2);
            let cells = io_utils::decode_record(&record, encoding)?;
            let params: Vec<&(dyn ToSql + Sync)> = cells
                .iter()
                .map(|cell| cell as &(dyn ToSql + Sync))
                .collect();
            if let Err(source) = tx.execute(&statement, &params) {
                error!("Error on row at line {line}: {source}");
                error!("Problematic row data: {cells:?}");
                // Dropping the transaction rolls back to the last checkpoint.
                return Err(ImportError::Row { line, source });
            }
            imported += 1;
            if imported % self.commit_every == 0 {
                tx.commit().map_err(ImportError::Commit)?;
                info!("Processed {imported} records...");
                tx = self.client.transaction().map_err(ImportError::Commit)?;
            }
        }
        tx.commit().map_err(ImportError::Commit)?;

        info!(
            "Successfully imported {imported} record(s) into {}",
            self.table
        );
        Ok(imported)
    }
}
