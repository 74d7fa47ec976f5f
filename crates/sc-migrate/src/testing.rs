//! Acceptance check for [`Dialect`] implementations.
//!
//! Run it against a scratch database: it writes the version row.

use sc_core::{Dialect, SchemaVersion};
use sc_db::Executor;

use crate::error::{MigrateError, MigrateResult};
use crate::store;

/// Check that `dialect` creates, reads and upserts the version row on `db`.
///
/// Verifies that the table can be created, that a fresh table reads as the
/// initial state, and that two successive saves land in the same row.
pub fn verify_dialect(db: &dyn Executor, dialect: &dyn Dialect) -> MigrateResult<()> {
    let check = |what: &str, e: sc_db::DbError| {
        MigrateError::DialectCheck(format!("{} ({}): {}", what, dialect.name(), e))
    };

    store::ensure_table(db, dialect).map_err(|e| check("create version table", e))?;
    store::read_current(db, dialect).map_err(|e| check("read version", e))?;

    for expected in [
        SchemaVersion::new(1, "checksum1"),
        SchemaVersion::new(2, "checksum2"),
    ] {
        store::write_version(db, dialect, &expected).map_err(|e| check("save version", e))?;
        let found = store::read_current(db, dialect).map_err(|e| check("read version", e))?;
        if found != expected {
            return Err(MigrateError::DialectCheck(format!(
                "{}: version mismatch, got {:?}, want {:?}",
                dialect.name(),
                found,
                expected
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "testing_test.rs"]
mod tests;
