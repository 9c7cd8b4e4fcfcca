pub mod cli;
pub mod config;
pub mod error;
pub mod identifier;
pub mod importer;
pub mod io_utils;
pub mod profile;
pub mod resolve;
pub mod run;
pub mod sql;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands, CommonArgs};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_ingest", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Import(args) => handle_import(&args),
        Commands::Sweep(args) => handle_sweep(&args),
    }
}

fn handle_import(args: &cli::ImportArgs) -> Result<()> {
    let (mapping, db, encoding) = load_shared(&args.common)?;
    let settings = run::RunSettings {
        data_dir: &args.common.data_dir,
        mapping: &mapping,
        db: &db,
        delimiter: args.common.delimiter,
        encoding,
        commit_every: args.common.commit_every,
    };
    info!(
        "Importing '{}' from {}",
        args.file,
        args.common.data_dir.display()
    );
    let summary = run::import_named_file(&settings, &args.file)?;
    report(&summary, args.common.summary_json)
}

fn handle_sweep(args: &cli::SweepArgs) -> Result<()> {
    let (mapping, db, encoding) = load_shared(&args.common)?;
    let settings = run::RunSettings {
        data_dir: &args.common.data_dir,
        mapping: &mapping,
        db: &db,
        delimiter: args.common.delimiter,
        encoding,
        commit_every: args.common.commit_every,
    };
    info!("Sweeping {}", args.common.data_dir.display());
    let summary = run::sweep_directory(&settings)?;
    report(&summary, args.common.summary_json)
}

fn load_shared(
    common: &CommonArgs,
) -> Result<(config::TableMapping, config::DbConfig, &'static encoding_rs::Encoding)> {
    let mapping = config::TableMapping::load(&common.mapping)?;
    let db = config::DbConfig::from_env()?;
    let encoding = io_utils::resolve_encoding(common.input_encoding.as_deref())?;
    Ok((mapping, db, encoding))
}

fn report(summary: &run::ImportRun, as_json: bool) -> Result<()> {
    info!(
        "Run complete: {} record(s) across {} file(s) in {:.2}s",
        summary.total_imported,
        summary.processed_files.len(),
        summary.elapsed_seconds
    );
    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(summary).context("Serializing run summary")?
        );
    }
    Ok(())
}
