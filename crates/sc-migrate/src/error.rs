//! Error types for the migration engine.

use sc_db::DbError;
use thiserror::Error;

/// Migration errors.
///
/// Migration numbers are 1-based throughout.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// The script source could not be listed (MG001).
    #[error("[MG001] Failed to list migration scripts: {0}")]
    Source(String),

    /// The version table could not be created (MG002).
    #[error("[MG002] Failed to create schema version table: {0}")]
    SchemaSetup(#[source] DbError),

    /// The version row could not be read or decoded (MG003).
    #[error("[MG003] Failed to read schema version: {0}")]
    VersionRead(#[source] DbError),

    /// The database records more migrations than the source provides (MG004).
    #[error("[MG004] Database version ({version}) exceeds available migrations ({available})")]
    VersionOverrun { version: usize, available: usize },

    /// An applied script no longer matches the recorded checksum (MG005).
    #[error(
        "[MG005] Schema integrity check failed at version {version}: expected checksum {expected:?}, found {found:?}"
    )]
    Integrity {
        version: usize,
        expected: String,
        found: String,
    },

    /// A script, or the version write following it, failed (MG006).
    ///
    /// `applied` is how many scripts of this call remain applied: always 0
    /// after a transactional rollback.
    #[error("[MG006] Failed to apply migration script {migration}: {source}")]
    Execution {
        migration: usize,
        applied: usize,
        #[source]
        source: DbError,
    },

    /// The batch transaction could not be started (MG007).
    #[error("[MG007] Failed to start migration transaction: {0}")]
    TransactionStart(#[source] DbError),

    /// The batch transaction could not be committed (MG008).
    #[error("[MG008] Failed to commit migrations: {0}")]
    Commit(#[source] DbError),

    /// Rolling back after a failure failed too; both errors are kept (MG009).
    #[error("[MG009] Rollback failed ({source}) after: {original}")]
    Rollback {
        original: Box<MigrateError>,
        #[source]
        source: DbError,
    },

    /// A dialect did not pass the acceptance check (MG010).
    #[error("[MG010] Dialect check failed: {0}")]
    DialectCheck(String),
}

impl MigrateError {
    /// Number of scripts from the failed call that remain applied.
    pub fn applied(&self) -> usize {
        match self {
            MigrateError::Execution { applied, .. } => *applied,
            _ => 0,
        }
    }

    /// 1-based number of the migration that failed, if any.
    pub fn migration(&self) -> Option<usize> {
        match self {
            MigrateError::Execution { migration, .. } => Some(*migration),
            MigrateError::Rollback { original, .. } => original.migration(),
            _ => None,
        }
    }
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
