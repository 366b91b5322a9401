//! Table schema introspection and column matching

use duckdb::Connection;
use serde::{Deserialize, Serialize};

use super::error::ImportError;
use super::types::ColumnType;

/// Metadata for one table column, as reported by `PRAGMA table_info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Position in declaration order (0-based)
    pub ordinal: usize,
    /// Column name
    pub name: String,
    /// Declared type as reported by the store
    pub declared_type: String,
    /// NOT NULL constraint
    pub not_null: bool,
    /// Default value expression, if any
    pub default_value: Option<String>,
    /// Part of the primary key
    pub is_primary_key: bool,
}

impl ColumnDescriptor {
    /// Type class used to coerce fields for this column
    pub fn column_type(&self) -> ColumnType {
        ColumnType::from_declared(&self.declared_type)
    }
}

/// Read the column descriptors of `table` in declaration order
///
/// No existence check is made: whatever the metadata query reports is
/// returned, and a failing query is passed back as [`ImportError::Database`].
pub fn read_table_schema(
    conn: &Connection,
    table: &str,
) -> Result<Vec<ColumnDescriptor>, ImportError> {
    let sql = format!("PRAGMA table_info('{}')", table.replace('\'', "''"));
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map([], |row| {
        Ok(ColumnDescriptor {
            ordinal: row.get::<_, i64>(0)? as usize,
            name: row.get(1)?,
            declared_type: row.get(2)?,
            not_null: row.get(3)?,
            default_value: row.get(4)?,
            is_primary_key: row.get(5)?,
        })
    })?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    columns.sort_by_key(|c| c.ordinal);

    tracing::debug!(table, columns = columns.len(), "Read table schema");
    Ok(columns)
}

/// How the records line up with the table's columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowShape {
    /// Every column is supplied
    Full,
    /// Every column except the primary key is supplied
    PrimaryKeyOmitted,
}

/// Target columns for one import, in insert order
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan<'a> {
    pub shape: RowShape,
    pub columns: Vec<&'a ColumnDescriptor>,
}

impl ImportPlan<'_> {
    /// Names of the target columns
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// A table's columns, validated to have at most one primary key column
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    table: String,
    columns: Vec<ColumnDescriptor>,
    primary_key: Option<usize>,
}

impl TableSchema {
    /// Validate the descriptors of `table`
    ///
    /// Composite primary keys are rejected with [`ImportError::TooManyPrimaryKeys`].
    pub fn new(table: &str, columns: Vec<ColumnDescriptor>) -> Result<Self, ImportError> {
        let pk_positions: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_primary_key)
            .map(|(i, _)| i)
            .collect();

        if pk_positions.len() > 1 {
            return Err(ImportError::TooManyPrimaryKeys {
                table: table.to_string(),
                count: pk_positions.len(),
            });
        }

        Ok(Self {
            table: table.to_string(),
            columns,
            primary_key: pk_positions.first().copied(),
        })
    }

    /// Table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// All columns in declaration order
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// The primary key column, if the table has one
    pub fn primary_key(&self) -> Option<&ColumnDescriptor> {
        self.primary_key.map(|i| &self.columns[i])
    }

    /// Columns other than the primary key, in declaration order
    pub fn non_key_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| !c.is_primary_key)
    }

    /// Match a record width against the schema
    ///
    /// A width equal to the column count supplies every column. One less
    /// supplies everything but the primary key, which is then left to the
    /// store's default. Any other width is rejected.
    pub fn plan(&self, width: usize) -> Result<ImportPlan<'_>, ImportError> {
        let total = self.columns.len();

        if width == total && total > 0 {
            return Ok(ImportPlan {
                shape: RowShape::Full,
                columns: self.columns.iter().collect(),
            });
        }

        if self.primary_key.is_some() && width + 1 == total {
            return Ok(ImportPlan {
                shape: RowShape::PrimaryKeyOmitted,
                columns: self.non_key_columns().collect(),
            });
        }

        let expected = match self.primary_key {
            Some(_) => format!("{} or {} (without the primary key)", total, total - 1),
            None => total.to_string(),
        };
        Err(ImportError::MissingColumns {
            found: width,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(ordinal: usize, name: &str, declared_type: &str, pk: bool) -> ColumnDescriptor {
        ColumnDescriptor {
            ordinal,
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            not_null: pk,
            default_value: None,
            is_primary_key: pk,
        }
    }

    fn people() -> Vec<ColumnDescriptor> {
        vec![
            column(0, "id", "INTEGER", true),
            column(1, "name", "VARCHAR", false),
            column(2, "score", "DOUBLE", false),
        ]
    }

    #[test]
    fn test_single_primary_key_accepted() {
        let schema = TableSchema::new("people", people()).unwrap();
        assert_eq!(schema.primary_key().map(|c| c.name.as_str()), Some("id"));
        assert_eq!(schema.non_key_columns().count(), 2);
    }

    #[test]
    fn test_composite_primary_key_rejected() {
        let mut columns = people();
        columns[1].is_primary_key = true;
        let err = TableSchema::new("people", columns).unwrap_err();
        assert!(matches!(
            err,
            ImportError::TooManyPrimaryKeys { count: 2, .. }
        ));
    }

    #[test]
    fn test_plan_full_width() {
        let schema = TableSchema::new("people", people()).unwrap();
        let plan = schema.plan(3).unwrap();
        assert_eq!(plan.shape, RowShape::Full);
        assert_eq!(plan.column_names(), vec!["id", "name", "score"]);
    }

    #[test]
    fn test_plan_primary_key_omitted() {
        let schema = TableSchema::new("people", people()).unwrap();
        let plan = schema.plan(2).unwrap();
        assert_eq!(plan.shape, RowShape::PrimaryKeyOmitted);
        assert_eq!(plan.column_names(), vec!["name", "score"]);
    }

    #[test]
    fn test_plan_key_in_middle_keeps_order() {
        let columns = vec![
            column(0, "a", "VARCHAR", false),
            column(1, "key", "INTEGER", true),
            column(2, "b", "VARCHAR", false),
        ];
        let schema = TableSchema::new("t", columns).unwrap();
        assert_eq!(schema.plan(2).unwrap().column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_plan_rejects_other_widths() {
        let schema = TableSchema::new("people", people()).unwrap();
        assert!(matches!(
            schema.plan(1),
            Err(ImportError::MissingColumns { found: 1, .. })
        ));
        assert!(matches!(
            schema.plan(4),
            Err(ImportError::MissingColumns { found: 4, .. })
        ));
    }

    #[test]
    fn test_plan_without_primary_key_requires_full_width() {
        let columns = vec![
            column(0, "a", "VARCHAR", false),
            column(1, "b", "VARCHAR", false),
        ];
        let schema = TableSchema::new("t", columns).unwrap();
        assert!(schema.plan(2).is_ok());
        assert!(matches!(
            schema.plan(1),
            Err(ImportError::MissingColumns { found: 1, .. })
        ));
    }

    #[test]
    fn test_plan_empty_schema() {
        let schema = TableSchema::new("missing", Vec::new()).unwrap();
        assert!(schema.plan(0).is_err());
        assert!(schema.plan(1).is_err());
    }

    #[test]
    fn test_read_table_schema() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE items (id INTEGER PRIMARY KEY, label VARCHAR NOT NULL, price DOUBLE DEFAULT 0.0)",
        )
        .unwrap();

        let columns = read_table_schema(&conn, "items").unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].ordinal, 0);
        assert_eq!(columns[0].name, "id");
        assert_eq!(columns[0].declared_type, "INTEGER");
        assert!(columns[0].is_primary_key);
        assert_eq!(columns[1].name, "label");
        assert!(columns[1].not_null);
        assert!(!columns[1].is_primary_key);
        assert_eq!(columns[2].column_type(), ColumnType::Real);
        assert!(columns[2].default_value.is_some());
    }

    #[test]
    fn test_read_table_schema_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(matches!(
            read_table_schema(&conn, "nope"),
            Err(ImportError::Database(_))
        ));
    }
}
