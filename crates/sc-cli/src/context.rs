//! Runtime context for CLI commands

use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};
use sc_core::{Config, DbType, DialectKind, LogLevel};
use sc_db::{DuckDbBackend, Executor, SqliteBackend};
use sc_migrate::{DirectoryScripts, Migrator, MigratorOptions};
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Loaded project configuration plus the running logger
pub struct ProjectContext {
    /// Project root all relative config paths resolve against
    pub root: PathBuf,

    /// Effective configuration
    pub config: Config,

    /// Resolved database path (`--database` wins over the config)
    pub database: String,

    _logger: LoggerHandle,
}

impl ProjectContext {
    /// Load the configuration and start logging.
    ///
    /// Without a config file in the project directory the defaults are used.
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&args.project_dir);

        let config = if let Some(config_path) = &args.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else if Config::find_in_dir(&root).is_some() {
            Config::load_from_dir(&root).context("Failed to load project configuration")?
        } else {
            Config::default()
        };

        let logger = init_logging(config.logging.level, args.verbose)?;

        let database = match &args.database {
            Some(path) => path.clone(),
            None => config.database_path_absolute(&root),
        };

        log::debug!(
            "Project {} using {} database {}",
            root.display(),
            config.database.db_type,
            database
        );

        Ok(Self {
            root,
            config,
            database,
            _logger: logger,
        })
    }

    /// Dialect for the configured database
    pub fn dialect(&self) -> DialectKind {
        self.config.dialect_kind()
    }

    /// The migrations directory as a script source
    pub fn source(&self) -> DirectoryScripts {
        let source = DirectoryScripts::new(self.config.migrations_path_absolute(&self.root));
        match &self.config.migrations.extension {
            Some(ext) => source.with_extension(ext.as_str()),
            None => source,
        }
    }

    /// Open the configured database
    pub fn connect(&self) -> Result<Box<dyn Executor>> {
        let db: Box<dyn Executor> = match self.config.database.db_type {
            DbType::Sqlite => Box::new(
                SqliteBackend::new(&self.database)
                    .with_context(|| format!("Failed to open database {}", self.database))?,
            ),
            DbType::DuckDb => Box::new(
                DuckDbBackend::new(&self.database)
                    .with_context(|| format!("Failed to open database {}", self.database))?,
            ),
        };
        Ok(db)
    }

    /// A migrator over `db` with the configured dialect and `options`
    pub fn migrator<'db>(&self, db: &'db dyn Executor, options: MigratorOptions) -> Migrator<'db> {
        Migrator::new(db, self.dialect().dialect()).with_options(options)
    }
}

/// Log to stderr at the configured level; `--verbose` raises it to debug
/// and `RUST_LOG` overrides both.
fn init_logging(level: LogLevel, verbose: bool) -> Result<LoggerHandle> {
    let level = if verbose {
        level.max(LogLevel::Debug)
    } else {
        level
    };

    Logger::try_with_env_or_str(level.as_str())
        .context("Invalid log specification")?
        .log_to_stderr()
        .start()
        .context("Failed to start logger")
}
