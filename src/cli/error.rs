//! CLI error types

use csvload::ImportError;
use thiserror::Error;

/// Errors surfaced by the command line front end
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Import failure
    #[error(transparent)]
    Import(#[from] ImportError),
}

impl CliError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            CliError::Import(err) => err.user_message(),
            _ => self.to_string(),
        }
    }
}
