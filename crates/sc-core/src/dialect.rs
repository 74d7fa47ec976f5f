//! SQL dialects for the schema version table.
//!
//! A [`Dialect`] only produces query text. Executing it is the job of the
//! execution capability in `sc-db`, which keeps dialects free of any
//! connection handling and lets the same dialect run over a plain
//! connection or an open transaction.

use serde::{Deserialize, Serialize};

/// Name of the table holding the singleton version record.
pub const VERSION_TABLE: &str = "schema_version";

/// Queries needed to create, read, and upsert the schema version record.
///
/// Implementations must uphold the following contract:
/// - the table has a row id column, a version number column, and a checksum
///   column;
/// - [`current_version_query`](Dialect::current_version_query) returns at most
///   one row with columns ordered `id, version, checksum`, and no row when the
///   table has never been written;
/// - [`save_version_query`](Dialect::save_version_query) upserts the row with
///   id 0, taking positional parameters in the order `(version, checksum)`.
///
/// `sc_migrate::testing::verify_dialect` checks a dialect against a live
/// database.
pub trait Dialect: Send + Sync {
    /// Statement that creates the version table if it does not exist.
    fn create_version_table_query(&self) -> &str;

    /// Query returning the current version row.
    fn current_version_query(&self) -> &str;

    /// Statement upserting the version row.
    fn save_version_query(&self) -> &str;

    /// Dialect name for logging
    fn name(&self) -> &'static str;
}

impl<D: Dialect + ?Sized> Dialect for Box<D> {
    fn create_version_table_query(&self) -> &str {
        (**self).create_version_table_query()
    }

    fn current_version_query(&self) -> &str {
        (**self).current_version_query()
    }

    fn save_version_query(&self) -> &str {
        (**self).save_version_query()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

const CREATE_VERSION_TABLE: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 0),
    version INTEGER NOT NULL,
    checksum TEXT NOT NULL
);";

const CURRENT_VERSION: &str = "SELECT id, version, checksum FROM schema_version;";

/// SQLite dialect using `INSERT OR REPLACE` for the upsert.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn create_version_table_query(&self) -> &str {
        CREATE_VERSION_TABLE
    }

    fn current_version_query(&self) -> &str {
        CURRENT_VERSION
    }

    fn save_version_query(&self) -> &str {
        "INSERT OR REPLACE INTO schema_version (id, version, checksum) VALUES (0, ?1, ?2);"
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

/// PostgreSQL dialect using a standard `ON CONFLICT` upsert.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn create_version_table_query(&self) -> &str {
        CREATE_VERSION_TABLE
    }

    fn current_version_query(&self) -> &str {
        CURRENT_VERSION
    }

    fn save_version_query(&self) -> &str {
        "INSERT INTO schema_version (id, version, checksum)
         VALUES (0, $1, $2)
         ON CONFLICT (id)
         DO UPDATE SET version = EXCLUDED.version, checksum = EXCLUDED.checksum;"
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

/// DuckDB dialect.
///
/// DuckDB accepts the PostgreSQL `ON CONFLICT` form; the version column is
/// declared `BIGINT` to match the 64-bit integers bound by the executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbDialect;

impl Dialect for DuckDbDialect {
    fn create_version_table_query(&self) -> &str {
        "CREATE TABLE IF NOT EXISTS schema_version (
             id BIGINT PRIMARY KEY CHECK (id = 0),
             version BIGINT NOT NULL,
             checksum VARCHAR NOT NULL
         );"
    }

    fn current_version_query(&self) -> &str {
        CURRENT_VERSION
    }

    fn save_version_query(&self) -> &str {
        "INSERT INTO schema_version (id, version, checksum)
         VALUES (0, $1, $2)
         ON CONFLICT (id)
         DO UPDATE SET version = EXCLUDED.version, checksum = EXCLUDED.checksum;"
    }

    fn name(&self) -> &'static str {
        "duckdb"
    }
}

/// Dialect selector, as written in `schemachain.yml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// SQLite
    Sqlite,
    /// PostgreSQL
    Postgres,
    /// DuckDB
    DuckDb,
}

impl DialectKind {
    /// Instantiate the stock dialect for this kind.
    pub fn dialect(self) -> Box<dyn Dialect> {
        match self {
            DialectKind::Sqlite => Box::new(SqliteDialect),
            DialectKind::Postgres => Box::new(PostgresDialect),
            DialectKind::DuckDb => Box::new(DuckDbDialect),
        }
    }
}

impl std::fmt::Display for DialectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialectKind::Sqlite => write!(f, "sqlite"),
            DialectKind::Postgres => write!(f, "postgres"),
            DialectKind::DuckDb => write!(f, "duckdb"),
        }
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
