//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Executor, Value};
use duckdb::types::{Null, ValueRef};
use duckdb::{Connection, ToSql};
use sc_core::DuckDbDialect;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
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
    pub fn default_dialect() -> DuckDbDialect {
        DuckDbDialect
    }

    /// Check if a table or view exists
    pub fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let (schema, table) = match name.rfind('.') {
            Some(pos) => (&name[..pos], &name[pos + 1..]),
            None => ("main", name),
        };

        let row = self.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
            &[Value::from(schema), Value::from(table)],
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

/// Read a column as a [`Value`] according to its declared type.
///
/// No cross-type conversion: a VARCHAR holding digits stays text.
fn read_value(row: &duckdb::Row<'_>, idx: usize) -> DbResult<Value> {
    let unsupported = |type_name: String| DbError::UnsupportedType {
        index: idx,
        type_name,
    };

    match row.get_ref(idx)? {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::TinyInt(n) => Ok(Value::Integer(n.into())),
        ValueRef::SmallInt(n) => Ok(Value::Integer(n.into())),
        ValueRef::Int(n) => Ok(Value::Integer(n.into())),
        ValueRef::BigInt(n) => Ok(Value::Integer(n)),
        ValueRef::UTinyInt(n) => Ok(Value::Integer(n.into())),
        ValueRef::USmallInt(n) => Ok(Value::Integer(n.into())),
        ValueRef::UInt(n) => Ok(Value::Integer(n.into())),
        ValueRef::UBigInt(n) => i64::try_from(n)
            .map(Value::Integer)
            .map_err(|_| unsupported(format!("UBIGINT {n} out of range"))),
        ValueRef::HugeInt(n) => i64::try_from(n)
            .map(Value::Integer)
            .map_err(|_| unsupported(format!("HUGEINT {n} out of range"))),
        ValueRef::Text(bytes) => String::from_utf8(bytes.to_vec())
            .map(Value::Text)
            .map_err(|_| unsupported("non-UTF-8 VARCHAR".to_string())),
        other => Err(unsupported(format!("{other:?}"))),
    }
}

impl Executor for DuckDbBackend {
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
        let bound: Vec<&dyn ToSql> = params.iter().map(bind).collect();
        let mut rows = stmt.query(bound.as_slice())?;

        // Column count is only reliable once the statement has been stepped.
        match rows.next()? {
            Some(row) => {
                let col_count = row.as_ref().column_count();
                let values = (0..col_count)
                    .map(|i| read_value(row, i))
                    .collect::<DbResult<Vec<_>>>()?;
                Ok(Some(values))
            }
            None => Ok(None),
        }
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
