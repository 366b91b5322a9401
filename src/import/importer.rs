//! Schema-driven bulk insert

use std::time::Duration;

use duckdb::Connection;
use serde::{Deserialize, Serialize};

use super::error::ImportError;
use super::rows::RowBatch;
use super::schema::{ImportPlan, RowShape, TableSchema};
use super::types::FieldValue;

/// Statistics from an import run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    /// Number of rows inserted
    pub rows_inserted: usize,
    /// Number of columns supplied per row
    pub columns: usize,
    /// Rows left the primary key to the store's default
    pub primary_key_omitted: bool,
    /// Duration of the import
    #[serde(skip)]
    pub duration: Duration,
}

impl ImportStats {
    /// Get rows per second throughput
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.rows_inserted as f64 / secs
        }
    }

    /// Format duration as human-readable string
    pub fn duration_string(&self) -> String {
        let secs = self.duration.as_secs();
        if secs < 60 {
            format!("{}.{:03}s", secs, self.duration.subsec_millis())
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
    }
}

/// Quote an identifier for use in SQL text
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a possibly schema-qualified table name, one identifier per part
fn quote_table(name: &str) -> String {
    name.split('.').map(quote_ident).collect::<Vec<_>>().join(".")
}

/// Build the parameterized INSERT for a plan
pub fn insert_statement(table: &str, plan: &ImportPlan<'_>) -> String {
    let columns: Vec<String> = plan.columns.iter().map(|c| quote_ident(&c.name)).collect();
    let placeholders = vec!["?"; plan.columns.len()];
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_table(table),
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// Coerce every record against the plan's columns
///
/// Stops at the first field that does not parse.
pub fn coerce_rows(
    plan: &ImportPlan<'_>,
    rows: &RowBatch,
) -> Result<Vec<Vec<FieldValue>>, ImportError> {
    let types: Vec<_> = plan.columns.iter().map(|c| c.column_type()).collect();

    rows.rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .zip(plan.columns.iter().zip(&types))
                .map(|(raw, (column, ty))| {
                    ty.coerce(raw).map_err(|_| ImportError::TypeCoercion {
                        record: i + 1,
                        column: column.name.clone(),
                        declared_type: column.declared_type.clone(),
                        value: raw.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

/// Insert every record of `rows` into the schema's table
///
/// Must run inside a transaction owned by the caller: rows are inserted one
/// statement execution at a time, so a failure part-way leaves earlier rows
/// for the caller to roll back. Validation and coercion finish before the
/// first insert. Returns the number of rows submitted.
pub fn bulk_import(
    conn: &Connection,
    schema: &TableSchema,
    rows: &RowBatch,
) -> Result<ImportStats, ImportError> {
    let width = rows.validate_shape()?;
    let plan = schema.plan(width)?;
    tracing::debug!(
        table = schema.table(),
        shape = ?plan.shape,
        columns = ?plan.column_names(),
        "Matched records to columns"
    );

    let values = coerce_rows(&plan, rows)?;

    let sql = insert_statement(schema.table(), &plan);
    let mut stmt = conn.prepare(&sql)?;
    for row in &values {
        stmt.execute(duckdb::params_from_iter(row.iter()))?;
    }

    Ok(ImportStats {
        rows_inserted: values.len(),
        columns: plan.columns.len(),
        primary_key_omitted: plan.shape == RowShape::PrimaryKeyOmitted,
        duration: Duration::ZERO,
    })
}
