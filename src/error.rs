//! Error taxonomy for the import pipeline.
//!
//! The orchestrator applies two different containment policies (propagate in
//! named-file mode, log-and-continue in sweep mode), so failures carry an
//! explicit kind rather than an opaque message. Configuration errors are
//! always raised before any database interaction.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// Missing directory, unmapped file name, bad mapping file, or a header
    /// that normalizes to an empty identifier. Raised before touching the
    /// database.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("opening input file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("reading delimited input: {0}")]
    Csv(#[from] csv::Error),

    #[error("decoding input text: {0}")]
    Encoding(String),

    /// Could not open a database session. Never retried here.
    #[error("database connection failed: {0}")]
    Connectivity(#[source] postgres::Error),

    /// DDL or statement preparation rejected by the server.
    #[error("schema statement rejected for table '{table}': {source}")]
    Schema {
        table: String,
        #[source]
        source: postgres::Error,
    },

    /// A single row failed to apply. The open batch rolls back to the last
    /// checkpoint; rows committed earlier stay committed.
    #[error("row at line {line} failed: {source}")]
    Row {
        line: u64,
        #[source]
        source: postgres::Error,
    },

    /// A checkpoint commit failed mid-import.
    #[error("transaction checkpoint failed: {0}")]
    Commit(#[source] postgres::Error),
}
