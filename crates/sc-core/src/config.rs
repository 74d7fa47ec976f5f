//! Configuration types and parsing for schemachain.yml

use crate::dialect::DialectKind;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// File names searched by [`Config::load_from_dir`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["schemachain.yml", "schemachain.yaml"];

/// Main configuration from schemachain.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Dialect for the version table; defaults to the database type's dialect
    #[serde(default)]
    pub dialect: Option<DialectKind>,

    /// Where migration scripts are read from
    #[serde(default)]
    pub migrations: MigrationsConfig,

    /// Apply each batch inside a single transaction
    #[serde(default = "default_true")]
    pub transaction: bool,

    /// Fail when an already-applied script has changed
    #[serde(default = "default_true")]
    pub verify_checksums: bool,

    /// Re-execute every script, including already-applied ones.
    ///
    /// Only safe when all scripts are idempotent.
    #[serde(default)]
    pub reapply_all: bool,

    /// 1-based migration numbers to skip
    #[serde(default)]
    pub exclude: Vec<usize>,

    /// Logging settings for the CLI
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            dialect: None,
            migrations: MigrationsConfig::default(),
            transaction: true,
            verify_checksums: true,
            reapply_all: false,
            exclude: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// SQLite (default)
    #[default]
    Sqlite,
    /// DuckDB
    DuckDb,
}

impl DbType {
    /// Stock dialect matching this database type
    pub fn default_dialect(self) -> DialectKind {
        match self {
            DbType::Sqlite => DialectKind::Sqlite,
            DbType::DuckDb => DialectKind::DuckDb,
        }
    }
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::Sqlite => write!(f, "sqlite"),
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type (sqlite or duckdb)
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
        }
    }
}

/// Migration script location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationsConfig {
    /// Directory of migration scripts, applied in file name order
    #[serde(default = "default_migrations_path")]
    pub path: String,

    /// Only files with this extension are read; all files when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            path: default_migrations_path(),
            extension: None,
        }
    }
}

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Level name as understood by `log` filter specs
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level written to stderr
    #[serde(default)]
    pub level: LogLevel,
}

fn default_true() -> bool {
    true
}

const DEFAULT_DB_PATH: &str = "schemachain.db";

const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_migrations_path() -> String {
    DEFAULT_MIGRATIONS_DIR.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for schemachain.yml or schemachain.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::load(&path),
            None => Err(CoreError::ConfigNotFound {
                path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
            }),
        }
    }

    /// Locate a configuration file in `dir`, if one exists
    pub fn find_in_dir(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.migrations.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations.path cannot be empty".to_string(),
            });
        }

        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        if self.exclude.contains(&0) {
            return Err(CoreError::ConfigInvalid {
                message: "exclude entries are 1-based migration numbers; 0 is not valid"
                    .to_string(),
            });
        }

        if self.dialect == Some(DialectKind::Postgres) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "dialect 'postgres' cannot be used with a local {} database",
                    self.database.db_type
                ),
            });
        }

        Ok(())
    }

    /// Effective dialect: the explicit one, or the database type's default
    pub fn dialect_kind(&self) -> DialectKind {
        self.dialect
            .unwrap_or_else(|| self.database.db_type.default_dialect())
    }

    /// Migration numbers to skip, deduplicated
    pub fn excluded_migrations(&self) -> BTreeSet<usize> {
        self.exclude.iter().copied().collect()
    }

    /// Migrations directory resolved against a project root
    pub fn migrations_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations.path)
    }

    /// Database path resolved against a project root.
    ///
    /// `:memory:` is passed through unchanged.
    pub fn database_path_absolute(&self, root: &Path) -> String {
        if self.database.path == ":memory:" {
            self.database.path.clone()
        } else {
            root.join(&self.database.path).display().to_string()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
