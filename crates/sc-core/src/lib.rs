//! sc-core - Core library for schemachain
//!
//! This crate provides the types shared by every schemachain component: the
//! persisted [`SchemaVersion`] record, the [`Dialect`] trait with its stock
//! implementations, the checksum chain used to detect drift, and the
//! `schemachain.yml` configuration file.

pub mod checksum;
pub mod config;
pub mod dialect;
pub mod error;
pub mod schema_version;

pub use checksum::{checksum_chain, normalized_sha256, Signer};
pub use config::{Config, DbType, LogLevel};
pub use dialect::{Dialect, DialectKind, DuckDbDialect, PostgresDialect, SqliteDialect};
pub use error::{CoreError, CoreResult};
pub use schema_version::SchemaVersion;
