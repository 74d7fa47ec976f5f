//! Execution capability trait definition

use crate::error::DbResult;

/// A parameter or column value crossing the executor boundary.
///
/// Only the types the schema version record needs are represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// Any integral column
    Integer(i64),
    /// Any character column
    Text(String),
}

impl Value {
    /// Integer payload, if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Text payload, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Minimal statement execution capability.
///
/// Implemented by plain connections and by [`crate::Transaction`] alike, so
/// code written against `&dyn Executor` runs unchanged inside or outside a
/// transaction. Calls are synchronous and block until the database answers.
pub trait Executor {
    /// Execute a single statement with positional parameters, returning the
    /// number of affected rows
    fn execute(&self, sql: &str, params: &[Value]) -> DbResult<usize>;

    /// Execute one or more statements without parameters
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query and return its first row, or `None` when it yields no rows
    fn query_row(&self, sql: &str, params: &[Value]) -> DbResult<Option<Vec<Value>>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, sql: &str, params: &[Value]) -> DbResult<usize> {
        (**self).execute(sql, params)
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        (**self).execute_batch(sql)
    }

    fn query_row(&self, sql: &str, params: &[Value]) -> DbResult<Option<Vec<Value>>> {
        (**self).query_row(sql, params)
    }

    fn db_type(&self) -> &'static str {
        (**self).db_type()
    }
}
