//! Import database connection and transactional sessions

use std::path::Path;
use std::time::Instant;

use duckdb::{Connection, Transaction};

use super::config::ImportConfig;
use super::error::ImportError;
use super::importer::{ImportStats, bulk_import};
use super::rows::RowBatch;
use super::schema::{ColumnDescriptor, TableSchema, read_table_schema};

/// Target database for CSV imports
pub struct ImportDb {
    conn: Connection,
    path: Option<String>,
}

impl ImportDb {
    /// Open or create a database at the given path
    pub fn open(path: &str) -> Result<Self, ImportError> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn memory() -> Result<Self, ImportError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// Get the database path (if not in-memory)
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Borrow the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Read a table's column descriptors outside of any import
    pub fn read_schema(&self, table: &str) -> Result<Vec<ColumnDescriptor>, ImportError> {
        read_table_schema(&self.conn, table)
    }

    /// Start an import into `table`
    ///
    /// Opens a transaction, reads the table's columns and rejects composite
    /// primary keys before any input is read.
    pub fn begin_import(&mut self, table: &str) -> Result<ImportSession<'_>, ImportError> {
        let tx = self.conn.transaction()?;
        let columns = read_table_schema(&tx, table)?;
        let schema = TableSchema::new(table, columns)?;

        Ok(ImportSession {
            tx: Some(tx),
            schema,
        })
    }

    /// Import every record of a CSV file into `table` as one transaction
    pub fn import_csv(&mut self, table: &str, csv_path: &Path) -> Result<ImportStats, ImportError> {
        let start = Instant::now();
        tracing::info!(table, csv = %csv_path.display(), "Starting import");

        let session = self.begin_import(table)?;
        let rows = RowBatch::from_path(csv_path)?;
        let mut stats = session.bulk_import(&rows)?;
        session.commit()?;

        stats.duration = start.elapsed();
        tracing::info!(
            table,
            rows = stats.rows_inserted,
            duration = %stats.duration_string(),
            "Import complete"
        );
        Ok(stats)
    }
}

/// Open the configured database and run one import
pub fn import_file(config: &ImportConfig) -> Result<ImportStats, ImportError> {
    let mut db = ImportDb::open(&config.database.display().to_string())?;
    db.import_csv(&config.table, &config.csv_path)
}

/// A running import holding the table's transaction
///
/// Only [`ImportSession::commit`] makes the inserted rows visible. Dropping
/// the session any other way rolls the transaction back.
pub struct ImportSession<'conn> {
    tx: Option<Transaction<'conn>>,
    schema: TableSchema,
}

impl ImportSession<'_> {
    /// Target table
    pub fn table(&self) -> &str {
        self.schema.table()
    }

    /// Validated schema of the target table
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Validate, coerce and insert a batch within this session's transaction
    pub fn bulk_import(&self, rows: &RowBatch) -> Result<ImportStats, ImportError> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| ImportError::Database("Transaction already finished".to_string()))?;
        bulk_import(tx, &self.schema, rows)
    }

    /// Commit the transaction
    pub fn commit(mut self) -> Result<(), ImportError> {
        if let Some(tx) = self.tx.take() {
            tx.commit()?;
            tracing::debug!(table = self.schema.table(), "Committed import");
        }
        Ok(())
    }
}

impl Drop for ImportSession<'_> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            match tx.rollback() {
                Ok(()) => tracing::warn!(table = self.schema.table(), "Import rolled back"),
                Err(e) => {
                    tracing::warn!(table = self.schema.table(), "Rollback failed: {}", e)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_table(ddl: &str) -> ImportDb {
        let db = ImportDb::memory().unwrap();
        db.connection().execute_batch(ddl).unwrap();
        db
    }

    fn count(db: &ImportDb, table: &str) -> i64 {
        db.connection()
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
            .unwrap()
    }

    fn batch(data: &[&[&str]]) -> RowBatch {
        data.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect::<Vec<Vec<String>>>()
            .into()
    }

    #[test]
    fn test_memory_db_has_no_path() {
        let db = ImportDb::memory().unwrap();
        assert!(db.path().is_none());
    }

    #[test]
    fn test_begin_import_rejects_composite_key() {
        let mut db = db_with_table("CREATE TABLE pairs (a INTEGER, b INTEGER, PRIMARY KEY (a, b))");
        let result = db.begin_import("pairs");
        assert!(matches!(
            result,
            Err(ImportError::TooManyPrimaryKeys { count: 2, .. })
        ));
    }

    #[test]
    fn test_session_commit() {
        let mut db = db_with_table("CREATE TABLE t (a INTEGER, b VARCHAR)");
        let session = db.begin_import("t").unwrap();
        assert_eq!(session.table(), "t");
        assert_eq!(session.schema().columns().len(), 2);
        let stats = session
            .bulk_import(&batch(&[&["1", "x"], &["2", "y"]]))
            .unwrap();
        assert_eq!(stats.rows_inserted, 2);
        session.commit().unwrap();

        assert_eq!(count(&db, "t"), 2);
    }

    #[test]
    fn test_session_drop_rolls_back() {
        let mut db = db_with_table("CREATE TABLE t (a INTEGER, b VARCHAR)");
        {
            let session = db.begin_import("t").unwrap();
            session
                .bulk_import(&batch(&[&["1", "x"], &["2", "y"]]))
                .unwrap();
        }
        assert_eq!(count(&db, "t"), 0);
    }

    #[test]
    fn test_constraint_violation_rolls_back_earlier_rows() {
        let mut db = db_with_table("CREATE TABLE t (id INTEGER PRIMARY KEY, b VARCHAR)");
        let result = {
            let session = db.begin_import("t").unwrap();
            session.bulk_import(&batch(&[&["1", "x"], &["2", "y"], &["1", "z"]]))
        };
        assert!(matches!(result, Err(ImportError::Database(_))));
        assert_eq!(count(&db, "t"), 0);
    }

    #[test]
    fn test_read_schema() {
        let db = db_with_table("CREATE TABLE t (id INTEGER PRIMARY KEY, b VARCHAR)");
        let columns = db.read_schema("t").unwrap();
        assert_eq!(columns.len(), 2);
        assert!(columns[0].is_primary_key);
    }
}
