use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Infer schemas from delimited files and upsert them into PostgreSQL", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import a single named file; any failure aborts the run
    Import(ImportArgs),
    /// Import every mapped file in the data directory, skipping files that fail
    Sweep(SweepArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// File name to import, resolved inside the data directory
    #[arg(short = 'f', long = "file")]
    pub file: String,
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct SweepArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Directory containing the delimited input files
    #[arg(short = 'd', long = "data-dir", default_value = "data")]
    pub data_dir: PathBuf,
    /// YAML file mapping file-name fragments to destination table names
    #[arg(short = 'm', long = "mapping")]
    pub mapping: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|'); defaults by file extension
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Commit a checkpoint after this many applied rows
    #[arg(long = "commit-every", default_value_t = crate::importer::DEFAULT_COMMIT_INTERVAL)]
    pub commit_every: usize,
    /// Print the run summary as JSON on stdout
    #[arg(long = "summary-json")]
    pub summary_json: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
