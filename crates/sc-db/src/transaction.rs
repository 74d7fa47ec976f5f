//! Explicit `BEGIN` / `COMMIT` / `ROLLBACK` transaction guard.

use crate::error::{DbError, DbResult};
use crate::traits::{Executor, Value};

/// An open transaction on an [`Executor`].
///
/// The guard is itself an `Executor`: statements run through it execute on
/// the underlying connection inside the transaction. It must be finished
/// with [`commit`](Transaction::commit) or
/// [`rollback`](Transaction::rollback); a guard dropped unfinished rolls
/// back.
pub struct Transaction<'a> {
    conn: &'a dyn Executor,
    finished: bool,
}

impl<'a> Transaction<'a> {
    /// Start a transaction on `conn`.
    pub fn begin(conn: &'a dyn Executor) -> DbResult<Self> {
        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::BeginError(e.to_string()))?;
        log::trace!("{} transaction started", conn.db_type());
        Ok(Self {
            conn,
            finished: false,
        })
    }

    /// Commit the transaction.
    ///
    /// If `COMMIT` fails the transaction is rolled back before the error is
    /// returned.
    pub fn commit(mut self) -> DbResult<()> {
        self.finished = true;
        if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                log::warn!("Rollback after failed commit also failed: {e}");
            }
            return Err(DbError::CommitError(commit_err.to_string()));
        }
        Ok(())
    }

    /// Roll the transaction back.
    pub fn rollback(mut self) -> DbResult<()> {
        self.finished = true;
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| DbError::RollbackError(e.to_string()))
    }
}

impl Executor for Transaction<'_> {
    fn execute(&self, sql: &str, params: &[Value]) -> DbResult<usize> {
        self.conn.execute(sql, params)
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.conn.execute_batch(sql)
    }

    fn query_row(&self, sql: &str, params: &[Value]) -> DbResult<Option<Vec<Value>>> {
        self.conn.query_row(sql, params)
    }

    fn db_type(&self) -> &'static str {
        self.conn.db_type()
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                log::warn!("Rollback of abandoned transaction failed: {e}");
            }
        }
    }
}

#[cfg(test)]
#[path = "transaction_test.rs"]
mod tests;
