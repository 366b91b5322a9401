//! csvload - schema-driven CSV import
//!
//! Provides:
//! - Table schema introspection
//! - Row validation against the table's columns
//! - Type coercion driven by declared column types
//! - All-or-nothing bulk insert

pub mod import;

// Re-export commonly used types
pub use import::{
    ColumnDescriptor, ColumnType, FieldValue, ImportConfig, ImportDb, ImportError, ImportSession,
    ImportStats, RowBatch, TableSchema, import_file,
};
