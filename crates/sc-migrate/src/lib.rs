//! Migration engine for schemachain.
//!
//! Applies an ordered list of SQL scripts exactly once each, recording
//! progress as a single `(version, checksum)` row. The checksum is a chain
//! over every applied script, so editing a script after it ran is detected
//! on the next [`Migrator::apply`].
//!
//! ```no_run
//! use sc_db::SqliteBackend;
//! use sc_migrate::Migrator;
//!
//! let db = SqliteBackend::new("app.db")?;
//! let migrator = Migrator::new(&db, SqliteBackend::default_dialect());
//! let applied = migrator.apply(&[
//!     "CREATE TABLE foo(id INTEGER PRIMARY KEY);",
//!     "CREATE TABLE bar(id INTEGER PRIMARY KEY);",
//! ])?;
//! println!("applied {applied} migrations");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod migration;
pub mod source;
pub mod store;
pub mod testing;

pub use error::{MigrateError, MigrateResult};
pub use migration::{ExecutionMode, MigrationStatus, Migrator, MigratorOptions};
pub use source::{DirectoryScripts, EmbeddedScripts, ScriptSource, StaticScripts};
