//! The checksum-chained migration runner.
//!
//! A [`Migrator`] applies the scripts of a [`ScriptSource`] that the
//! database has not seen yet and records progress in the `schema_version`
//! row. The recorded checksum is `chain[version]` (see
//! [`sc_core::checksum_chain`]), so a script edited after it was applied is
//! caught before anything new runs.

use std::collections::BTreeSet;

use log::{debug, info};
use sc_core::{normalized_sha256, Config, Dialect, SchemaVersion, Signer};
use sc_db::{Executor, Transaction};
use serde::Serialize;

use crate::error::{MigrateError, MigrateResult};
use crate::source::ScriptSource;
use crate::store;

type Filter = Box<dyn Fn(usize) -> bool + Send + Sync>;

/// How a batch of migrations is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// The whole batch runs in one transaction and is rolled back on error.
    #[default]
    Transactional,
    /// Each script commits on its own; a failure keeps earlier scripts.
    NonTransactional,
}

/// Plain-data form of the migrator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratorOptions {
    pub mode: ExecutionMode,
    pub validate_checksums: bool,
    pub full_reapply: bool,
    /// 1-based migration numbers to skip
    pub excluded: BTreeSet<usize>,
}

impl Default for MigratorOptions {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Transactional,
            validate_checksums: true,
            full_reapply: false,
            excluded: BTreeSet::new(),
        }
    }
}

impl MigratorOptions {
    /// Options as configured in `schemachain.yml`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            mode: if config.transaction {
                ExecutionMode::Transactional
            } else {
                ExecutionMode::NonTransactional
            },
            validate_checksums: config.verify_checksums,
            full_reapply: config.reapply_all,
            excluded: config.excluded_migrations(),
        }
    }
}

/// Where a database stands relative to a list of scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    /// The recorded version row.
    pub current: SchemaVersion,
    /// Number of scripts the source provides.
    pub available: usize,
    /// 1-based numbers the next apply would run.
    pub pending: Vec<usize>,
    /// Whether the recorded checksum matches the scripts.
    pub checksum_valid: bool,
    /// Whether a checksum mismatch stops `apply`.
    pub checksum_enforced: bool,
}

impl MigrationStatus {
    /// The database records more migrations than the source has.
    pub fn is_overrun(&self) -> bool {
        self.current.version > self.available
    }

    /// Nothing pending and no drift.
    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty() && self.checksum_valid
    }

    /// `apply` would refuse to run: overrun, or drift with validation on.
    pub fn is_blocked(&self) -> bool {
        self.is_overrun() || (self.checksum_enforced && !self.checksum_valid)
    }
}

/// Applies migration scripts against one database.
///
/// Built with [`Migrator::new`] and configured with the `with_*` builders.
/// One `apply` at a time per database; the migrator does no locking of
/// its own.
pub struct Migrator<'db> {
    db: &'db dyn Executor,
    dialect: Box<dyn Dialect>,
    sign: Signer,
    filter: Filter,
    mode: ExecutionMode,
    validate_checksums: bool,
    full_reapply: bool,
}

impl<'db> Migrator<'db> {
    /// Create a migrator with default settings: transactional, checksum
    /// validation on, every migration included.
    pub fn new<D: Dialect + 'static>(db: &'db dyn Executor, dialect: D) -> Self {
        Self {
            db,
            dialect: Box::new(dialect),
            sign: normalized_sha256,
            filter: Box::new(|_: usize| true),
            mode: ExecutionMode::default(),
            validate_checksums: true,
            full_reapply: false,
        }
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Disable to apply on top of a drifted history.
    pub fn with_checksum_validation(mut self, enabled: bool) -> Self {
        self.validate_checksums = enabled;
        self
    }

    /// Only migrations whose 1-based number passes `filter` are executed.
    ///
    /// A skipped migration is not recorded on its own, but a later
    /// migration in the same batch advances the version past it.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        self.filter = Box::new(filter);
        self
    }

    /// Re-run every script from the first one, not only the pending ones.
    ///
    /// The version row is not reset first, so this is only safe when every
    /// script is idempotent (`CREATE TABLE IF NOT EXISTS` and the like).
    /// Re-running a script below the recorded version never lowers the
    /// recorded version, even when a filter skips later scripts.
    pub fn with_full_reapply(mut self, enabled: bool) -> Self {
        self.full_reapply = enabled;
        self
    }

    /// Replace the default whitespace-insensitive SHA-256 signer.
    pub fn with_signer(mut self, sign: Signer) -> Self {
        self.sign = sign;
        self
    }

    /// Apply every setting in `options`.
    pub fn with_options(self, options: MigratorOptions) -> Self {
        let MigratorOptions {
            mode,
            validate_checksums,
            full_reapply,
            excluded,
        } = options;

        let migrator = self
            .with_execution_mode(mode)
            .with_checksum_validation(validate_checksums)
            .with_full_reapply(full_reapply);

        if excluded.is_empty() {
            migrator
        } else {
            migrator.with_filter(move |number| !excluded.contains(&number))
        }
    }

    /// Name of the dialect in use.
    pub fn dialect_name(&self) -> &'static str {
        self.dialect.name()
    }

    /// Apply all pending migrations, returning how many scripts ran.
    ///
    /// Returns `Ok(0)` when the database is already up to date.
    pub fn apply<S: ScriptSource + ?Sized>(&self, source: &S) -> MigrateResult<usize> {
        let scripts = source.list()?;

        store::ensure_table(self.db, &*self.dialect).map_err(MigrateError::SchemaSetup)?;
        let current = self.current_schema_version()?;
        let chain = self.verified_chain(&scripts, &current)?;

        if !self.full_reapply && current.version == scripts.len() {
            debug!("Schema is up to date at {}", current);
            return Ok(0);
        }

        let start = if self.full_reapply { 0 } else { current.version };
        info!(
            "Applying migrations {}..={} on {} ({})",
            start + 1,
            scripts.len(),
            self.db.db_type(),
            self.dialect.name()
        );

        let batch = Batch {
            scripts: &scripts,
            chain: &chain,
            start,
            recorded: current.version,
        };
        let applied = match self.mode {
            ExecutionMode::Transactional => self.apply_in_transaction(&batch)?,
            ExecutionMode::NonTransactional => self.apply_range(self.db, &batch)?,
        };

        info!("Applied {} migration(s)", applied);
        Ok(applied)
    }

    /// Read the recorded version without creating anything.
    ///
    /// A database with the table but no row reads as version 0.
    pub fn current_schema_version(&self) -> MigrateResult<SchemaVersion> {
        store::read_current(self.db, &*self.dialect).map_err(MigrateError::VersionRead)
    }

    /// Compare the database with `source` without applying anything.
    ///
    /// Creates the version table if it is missing. `checksum_valid` always
    /// reports drift; `checksum_enforced` says whether `apply` would reject it.
    pub fn status<S: ScriptSource + ?Sized>(&self, source: &S) -> MigrateResult<MigrationStatus> {
        let scripts = source.list()?;

        store::ensure_table(self.db, &*self.dialect).map_err(MigrateError::SchemaSetup)?;
        let current = self.current_schema_version()?;
        let available = scripts.len();

        if current.version > available {
            return Ok(MigrationStatus {
                current,
                available,
                pending: Vec::new(),
                checksum_valid: false,
                checksum_enforced: self.validate_checksums,
            });
        }

        let chain = self.checksum_chain(&scripts);
        let checksum_valid = current.is_initial() || chain[current.version] == current.checksum;
        let start = if self.full_reapply { 0 } else { current.version };
        let pending = (start + 1..=available)
            .filter(|number| (self.filter)(*number))
            .collect();

        Ok(MigrationStatus {
            current,
            available,
            pending,
            checksum_valid,
            checksum_enforced: self.validate_checksums,
        })
    }

    /// The checksum chain of `scripts` under this migrator's signer.
    pub fn checksum_chain<S: AsRef<str>>(&self, scripts: &[S]) -> Vec<String> {
        sc_core::checksum_chain(scripts, self.sign)
    }

    fn verified_chain(
        &self,
        scripts: &[String],
        current: &SchemaVersion,
    ) -> MigrateResult<Vec<String>> {
        if current.version > scripts.len() {
            return Err(MigrateError::VersionOverrun {
                version: current.version,
                available: scripts.len(),
            });
        }

        let chain = self.checksum_chain(scripts);
        let expected = &chain[current.version];
        if self.validate_checksums && !current.is_initial() && *expected != current.checksum {
            return Err(MigrateError::Integrity {
                version: current.version,
                expected: expected.clone(),
                found: current.checksum.clone(),
            });
        }

        Ok(chain)
    }

    fn apply_in_transaction(&self, batch: &Batch<'_>) -> MigrateResult<usize> {
        let tx = Transaction::begin(self.db).map_err(MigrateError::TransactionStart)?;

        match self.apply_range(&tx, batch) {
            Ok(applied) => {
                tx.commit().map_err(MigrateError::Commit)?;
                Ok(applied)
            }
            Err(err) => {
                let err = discard_progress(err);
                match tx.rollback() {
                    Ok(()) => Err(err),
                    Err(source) => Err(MigrateError::Rollback {
                        original: Box::new(err),
                        source,
                    }),
                }
            }
        }
    }

    fn apply_range(&self, db: &dyn Executor, batch: &Batch<'_>) -> MigrateResult<usize> {
        let mut applied = 0;

        for (index, script) in batch.scripts.iter().enumerate().skip(batch.start) {
            let number = index + 1;
            if !(self.filter)(number) {
                debug!("Skipping migration {:03}", number);
                continue;
            }
            debug!("Applying migration {:03}", number);

            db.execute_batch(script)
                .and_then(|()| {
                    // A reapplied script below the recorded version leaves it alone.
                    if number < batch.recorded {
                        return Ok(());
                    }
                    let version = SchemaVersion::new(number, batch.chain[number].clone());
                    store::write_version(db, &*self.dialect, &version)
                })
                .map_err(|source| MigrateError::Execution {
                    migration: number,
                    applied,
                    source,
                })?;
            applied += 1;
        }

        Ok(applied)
    }
}

/// The scripts selected by one `apply` call.
struct Batch<'a> {
    scripts: &'a [String],
    chain: &'a [String],
    /// 0-based index of the first script to run
    start: usize,
    /// Version recorded before the batch started
    recorded: usize,
}

/// A rolled-back batch leaves nothing applied.
fn discard_progress(err: MigrateError) -> MigrateError {
    match err {
        MigrateError::Execution {
            migration, source, ..
        } => MigrateError::Execution {
            migration,
            applied: 0,
            source,
        },
        other => other,
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
