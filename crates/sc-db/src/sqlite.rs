//! SQLite database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Executor, Value};
use rusqlite::types::{Null, Value as SqliteValue};
use rusqlite::{Connection, ToSql};
use sc_core::SqliteDialect;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite database backend
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Create a new in-memory SQLite connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new SQLite connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// The stock dialect for this backend
    pub fn default_dialect() -> SqliteDialect {
        SqliteDialect
    }

    /// Check if a table or view exists
    pub fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let row = self.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
            &[Value::from(name)],
        )?;

        Ok(matches!(
            row.as_deref(),
            Some([Value::Integer(count)]) if *count > 0
        ))
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }
}

fn bind(value: &Value) -> &dyn ToSql {
    match value {
        Value::Null => &Null,
        Value::Integer(n) => n,
        Value::Text(s) => s,
    }
}

fn read_value(row: &rusqlite::Row<'_>, idx: usize) -> DbResult<Value> {
    match row.get::<_, SqliteValue>(idx)? {
        SqliteValue::Null => Ok(Value::Null),
        SqliteValue::Integer(n) => Ok(Value::Integer(n)),
        SqliteValue::Text(s) => Ok(Value::Text(s)),
        SqliteValue::Real(_) => Err(DbError::UnsupportedType {
            index: idx,
            type_name: "REAL".to_string(),
        }),
        SqliteValue::Blob(_) => Err(DbError::UnsupportedType {
            index: idx,
            type_name: "BLOB".to_string(),
        }),
    }
}

impl Executor for SqliteBackend {
    fn execute(&self, sql: &str, params: &[Value]) -> DbResult<usize> {
        let conn = self.lock()?;
        let bound: Vec<&dyn ToSql> = params.iter().map(bind).collect();
        conn.execute(sql, bound.as_slice())
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql.trim())))
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn query_row(&self, sql: &str, params: &[Value]) -> DbResult<Option<Vec<Value>>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql.trim())))?;
        let col_count = stmt.column_count();
        let bound: Vec<&dyn ToSql> = params.iter().map(bind).collect();
        let mut rows = stmt.query(bound.as_slice())?;

        match rows.next()? {
            Some(row) => {
                let values = (0..col_count)
                    .map(|i| read_value(row, i))
                    .collect::<DbResult<Vec<_>>>()?;
                Ok(Some(values))
            }
            None => Ok(None),
        }
    }

    fn db_type(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
#[path = "sqlite_test.rs"]
mod tests;
