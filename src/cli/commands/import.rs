//! Import command implementation

use std::path::PathBuf;

use crate::error::CliError;
use csvload::{ImportConfig, ImportStats, import_file};

/// Arguments for the import command
pub struct ImportArgs {
    /// Path to the database file
    pub database: PathBuf,
    /// Existing table to load into
    pub table: String,
    /// CSV file to read
    pub csv_file: PathBuf,
}

/// Handle the import command
pub fn handle_import(args: &ImportArgs) -> Result<ImportStats, CliError> {
    let config = ImportConfig::builder()
        .database(&args.database)
        .table(&args.table)
        .csv_path(&args.csv_file)
        .build()
        .map_err(CliError::InvalidArgument)?;

    let stats = import_file(&config)?;

    println!(
        "Imported {} row(s) into '{}' in {}",
        stats.rows_inserted,
        config.table,
        stats.duration_string()
    );

    Ok(stats)
}
