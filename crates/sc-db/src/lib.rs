//! sc-db - Execution layer for schemachain
//!
//! This crate provides the `Executor` trait the migration engine runs
//! statements through, a `Transaction` guard that is itself an `Executor`,
//! and backends for DuckDB and SQLite.

pub mod duckdb;
pub mod error;
pub mod sqlite;
pub mod traits;
pub mod transaction;

pub use self::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use sqlite::SqliteBackend;
pub use traits::{Executor, Value};
pub use transaction::Transaction;
