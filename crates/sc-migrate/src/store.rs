//! Schema version store.
//!
//! Reads and writes the singleton `schema_version` row through any
//! [`Executor`], so the same calls work on a connection or inside a
//! transaction.

use sc_core::{Dialect, SchemaVersion};
use sc_db::{DbError, DbResult, Executor, Value};

/// Create the version table if it does not exist.
pub fn ensure_table(db: &dyn Executor, dialect: &dyn Dialect) -> DbResult<()> {
    db.execute_batch(dialect.create_version_table_query())
}

/// Read the current version row.
///
/// A table with no row is the initial state and reads as
/// [`SchemaVersion::default`].
pub fn read_current(db: &dyn Executor, dialect: &dyn Dialect) -> DbResult<SchemaVersion> {
    match db.query_row(dialect.current_version_query(), &[])? {
        Some(row) => decode_row(&row),
        None => Ok(SchemaVersion::default()),
    }
}

/// Upsert the version row.
pub fn write_version(
    db: &dyn Executor,
    dialect: &dyn Dialect,
    version: &SchemaVersion,
) -> DbResult<()> {
    let number = i64::try_from(version.version).map_err(|_| {
        DbError::RowMismatch(format!("schema version {} out of range", version.version))
    })?;

    db.execute(
        dialect.save_version_query(),
        &[Value::Integer(number), Value::Text(version.checksum.clone())],
    )?;
    Ok(())
}

fn decode_row(row: &[Value]) -> DbResult<SchemaVersion> {
    match row {
        [Value::Integer(id), Value::Integer(version), Value::Text(checksum)] => {
            let version = usize::try_from(*version).map_err(|_| {
                DbError::RowMismatch(format!("negative schema version {version}"))
            })?;
            Ok(SchemaVersion {
                id: *id,
                version,
                checksum: checksum.clone(),
            })
        }
        other => Err(DbError::RowMismatch(format!(
            "expected (id, version, checksum), got {other:?}"
        ))),
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
