//! Declared column types and value coercion

use std::fmt;

use duckdb::ToSql;
use duckdb::types::{ToSqlOutput, Value};
use serde::{Deserialize, Serialize};

/// Type class of a column, derived from its declared type name
///
/// Only the classes the importer converts to are distinguished; every other
/// declared type (TEXT, VARCHAR, BLOB, DATE, ...) is passed through as text
/// and left to the store to cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// `NULL` - every field becomes NULL
    Null,
    /// Signed integers
    Integer,
    /// Floating point, parsed as `f64`
    ///
    /// A DuckDB `REAL` column is single precision, so a value stored there
    /// reads back rounded to `f32`; `DOUBLE` keeps the full value.
    Real,
    /// Text, binary and anything else
    Opaque,
}

impl ColumnType {
    /// Classify a declared type name as reported by the store
    ///
    /// Matching is case-insensitive. DuckDB normalises declared types, so a
    /// column created as `REAL` reports `FLOAT`; both map to [`ColumnType::Real`].
    pub fn from_declared(declared: &str) -> Self {
        match declared.trim().to_uppercase().as_str() {
            "NULL" => ColumnType::Null,
            "INTEGER" | "INT" | "BIGINT" | "SMALLINT" | "TINYINT" => ColumnType::Integer,
            "REAL" | "FLOAT" | "DOUBLE" => ColumnType::Real,
            _ => ColumnType::Opaque,
        }
    }

    /// Convert a raw text field into a value of this type
    pub fn coerce(self, raw: &str) -> Result<FieldValue, CoercionError> {
        match self {
            ColumnType::Null => Ok(FieldValue::Null),
            ColumnType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| CoercionError { target: self }),
            ColumnType::Real => raw
                .trim()
                .parse::<f64>()
                .map(FieldValue::Real)
                .map_err(|_| CoercionError { target: self }),
            ColumnType::Opaque => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Null => "NULL",
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Opaque => "TEXT",
        };
        write!(f, "{}", s)
    }
}

/// A field that failed to parse as its column's type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercionError {
    pub target: ColumnType,
}

/// A coerced field value, ready to bind to an insert statement
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        let value = match self {
            FieldValue::Null => Value::Null,
            FieldValue::Integer(n) => Value::BigInt(*n),
            FieldValue::Real(f) => Value::Double(*f),
            FieldValue::Text(s) => Value::Text(s.clone()),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}
