//! Error types for import operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while importing a CSV file into a table
#[derive(Error, Debug)]
pub enum ImportError {
    /// The input file contains no records
    #[error("Input contains no records")]
    EmptyInput,

    /// A record's field count differs from the first record's
    #[error("Inconsistent column count at record {record}: expected {expected}, found {found}")]
    InconsistentColumnCount {
        record: usize,
        expected: usize,
        found: usize,
    },

    /// Row width matches neither the full column list nor the list without the primary key
    #[error("Records have {found} field(s) but the table accepts {expected}")]
    MissingColumns { found: usize, expected: String },

    /// The table declares a composite primary key
    #[error("Table '{table}' has {count} primary key columns; only single-column keys are supported")]
    TooManyPrimaryKeys { table: String, count: usize },

    /// A field could not be converted to its column's declared type
    #[error(
        "Cannot convert '{value}' to {declared_type} for column '{column}' at record {record}"
    )]
    TypeCoercion {
        record: usize,
        column: String,
        declared_type: String,
        value: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Input file not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Malformed CSV input
    #[error("CSV error: {0}")]
    Csv(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            ImportError::EmptyInput => {
                "Input file contains no records.\n\nHint: Nothing was imported; check the file path."
                    .to_string()
            }
            ImportError::InconsistentColumnCount {
                record,
                expected,
                found,
            } if *found == 0 => {
                format!(
                    "Record {record} is a blank line, but the first record has {expected} field(s).\n\n\
                    Hint: Remove blank lines, including any after the last record."
                )
            }
            ImportError::InconsistentColumnCount {
                record,
                expected,
                found,
            } => {
                format!(
                    "Record {record} has {found} field(s), but the first record has {expected}.\n\n\
                    Hint: Every line of the file must have the same number of fields."
                )
            }
            ImportError::MissingColumns { found, expected } => {
                format!(
                    "Records have {found} field(s) but the table accepts {expected}.\n\n\
                    Hint: Supply every column, or every column except the primary key."
                )
            }
            ImportError::TooManyPrimaryKeys { table, count } => {
                format!(
                    "Table '{table}' has a composite primary key ({count} columns).\n\n\
                    Hint: Only tables with a single-column primary key can be imported."
                )
            }
            ImportError::FileNotFound(path) => {
                format!(
                    "File not found: {}\n\nHint: Check that the file exists and the path is correct.",
                    path.display()
                )
            }
            _ => self.to_string(),
        }
    }
}

impl From<duckdb::Error> for ImportError {
    fn from(err: duckdb::Error) -> Self {
        ImportError::Database(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        match err.position() {
            Some(pos) => ImportError::Csv(format!("record {}: {}", pos.record() + 1, err)),
            None => ImportError::Csv(err.to_string()),
        }
    }
}
