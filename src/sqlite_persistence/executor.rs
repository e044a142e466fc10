use super::field_value::FieldValue;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Table {0} does not exist")]
    MissingTable(String),

    #[error("Query failed: {source} ({query})")]
    Query {
        query: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    fn from_query(source: rusqlite::Error, query: &str) -> Self {
        let message = source.to_string();
        if let Some(table) = message.split("no such table: ").nth(1) {
            return StoreError::MissingTable(table.trim().to_string());
        }
        StoreError::Query {
            query: query.to_string(),
            source,
        }
    }

    pub fn is_missing_table(&self) -> bool {
        matches!(self, StoreError::MissingTable(_))
    }
}

/// Rows returned by a [`StorageExecutor`]. Statements that produce no result
/// columns report the number of changed rows instead.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<FieldValue>>,
    pub changes: usize,
}

impl RowSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }
}

/// Opaque query runner: one query string in, an ordered row set out.
pub trait StorageExecutor: Send + Sync {
    fn execute(&self, sql: &str) -> Result<RowSet, StoreError>;
}

#[derive(Clone)]
pub struct SqliteExecutor {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteExecutor {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }
}

impl StorageExecutor for SqliteExecutor {
    fn execute(&self, sql: &str) -> Result<RowSet, StoreError> {
        trace!("Executing: {}", sql);
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StoreError::from_query(e, sql))?;

        let column_count = stmt.column_count();
        if column_count == 0 {
            let changes = stmt
                .execute([])
                .map_err(|e| StoreError::from_query(e, sql))?;
            return Ok(RowSet {
                changes,
                ..Default::default()
            });
        }

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = stmt.query([]).map_err(|e| StoreError::from_query(e, sql))?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            let mut row_values = Vec::with_capacity(column_count);
            for index in 0..column_count {
                row_values.push(FieldValue::from(row.get_ref(index)?));
            }
            values.push(row_values);
        }

        Ok(RowSet {
            columns,
            rows: values,
            changes: 0,
        })
    }
}
