//! CSV import into existing tables
//!
//! Loads a headerless CSV file into a table, converting each field to the
//! type its column declares:
//! - Schema introspection (`PRAGMA table_info`)
//! - Row shape validation and column matching
//! - Per-column type coercion
//! - Single-transaction bulk insert

pub mod config;
pub mod db;
pub mod error;
pub mod importer;
pub mod rows;
pub mod schema;
pub mod types;

pub use config::{ImportConfig, ImportConfigBuilder};
pub use db::{ImportDb, ImportSession, import_file};
pub use error::ImportError;
pub use importer::{ImportStats, bulk_import, coerce_rows, insert_statement};
pub use rows::RowBatch;
pub use schema::{ColumnDescriptor, ImportPlan, RowShape, TableSchema, read_table_schema};
pub use types::{CoercionError, ColumnType, FieldValue};
