//! Configuration for an import run

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for importing one CSV file into one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Database file (created if absent)
    pub database: PathBuf,
    /// Existing table to load into
    pub table: String,
    /// Headerless CSV file to read
    pub csv_path: PathBuf,
}

impl ImportConfig {
    /// Create a new builder for ImportConfig
    pub fn builder() -> ImportConfigBuilder {
        ImportConfigBuilder::default()
    }
}

/// Builder for ImportConfig
#[derive(Debug, Default)]
pub struct ImportConfigBuilder {
    database: Option<PathBuf>,
    table: Option<String>,
    csv_path: Option<PathBuf>,
}

impl ImportConfigBuilder {
    /// Set the database path
    pub fn database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = Some(path.into());
        self
    }

    /// Set the target table
    pub fn table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    /// Set the CSV file path
    pub fn csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = Some(path.into());
        self
    }

    /// Build the ImportConfig
    pub fn build(self) -> Result<ImportConfig, String> {
        let database = self.database.ok_or("Database path is required")?;
        let table = self.table.ok_or("Table name is required")?;
        let csv_path = self.csv_path.ok_or("CSV file path is required")?;

        if table.trim().is_empty() {
            return Err("Table name must not be empty".to_string());
        }

        Ok(ImportConfig {
            database,
            table,
            csv_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_config_builder() {
        let config = ImportConfig::builder()
            .database("data.duckdb")
            .table("people")
            .csv_path("people.csv")
            .build()
            .unwrap();

        assert_eq!(config.database, PathBuf::from("data.duckdb"));
        assert_eq!(config.table, "people");
        assert_eq!(config.csv_path, PathBuf::from("people.csv"));
    }

    #[test]
    fn test_import_config_requires_fields() {
        let err = ImportConfig::builder()
            .table("people")
            .csv_path("people.csv")
            .build()
            .unwrap_err();
        assert_eq!(err, "Database path is required");

        let err = ImportConfig::builder()
            .database("data.duckdb")
            .csv_path("people.csv")
            .build()
            .unwrap_err();
        assert_eq!(err, "Table name is required");
    }

    #[test]
    fn test_import_config_rejects_blank_table() {
        let result = ImportConfig::builder()
            .database("data.duckdb")
            .table("  ")
            .csv_path("people.csv")
            .build();
        assert!(result.is_err());
    }
}
