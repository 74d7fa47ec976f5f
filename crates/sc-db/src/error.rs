//! Error types for sc-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Transaction could not be started (D003)
    #[error("[D003] BEGIN failed: {0}")]
    BeginError(String),

    /// Transaction could not be committed (D004)
    #[error("[D004] COMMIT failed: {0}")]
    CommitError(String),

    /// Transaction could not be rolled back (D005)
    #[error("[D005] ROLLBACK failed: {0}")]
    RollbackError(String),

    /// A column held a type the executor cannot represent (D006)
    #[error("[D006] Unsupported column type at index {index}: {type_name}")]
    UnsupportedType { index: usize, type_name: String },

    /// Mutex poisoned (D007)
    #[error("[D007] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// A row did not have the expected shape (D008)
    #[error("[D008] Unexpected row: {0}")]
    RowMismatch(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
