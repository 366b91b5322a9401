//! csvload - load a CSV file into an existing table

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use commands::import::{ImportArgs, handle_import};

#[derive(Parser)]
#[command(
    name = "csvload",
    about = "Bulk-load a headerless CSV file into an existing table, typed by the table's schema",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Database file (created if absent)
    #[arg(allow_hyphen_values = true)]
    database_file: PathBuf,
    /// Existing table to load into
    #[arg(allow_hyphen_values = true)]
    table_name: String,
    /// Headerless, comma-separated UTF-8 file
    #[arg(allow_hyphen_values = true)]
    csv_file: PathBuf,
}

/// Print the one-line usage banner and exit with status 1
fn usage() -> ! {
    let command = std::env::args_os().next().unwrap_or_default();
    let name = Path::new(&command)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csvload".to_string());
    println!("Usage: {} database_file table_name csv_file", name);
    process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Exactly three positionals; flags are file or table names like any other.
    if std::env::args_os().len() != 4 {
        usage();
    }
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(_) => usage(),
    };

    let args = ImportArgs {
        database: cli.database_file,
        table: cli.table_name,
        csv_file: cli.csv_file,
    };

    if let Err(err) = handle_import(&args) {
        tracing::debug!("import failed: {err}");
        eprintln!("Error: {}", err.user_message());
        process::exit(1);
    }
}
