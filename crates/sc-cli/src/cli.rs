//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// schemachain - ordered SQL migrations guarded by a checksum chain
#[derive(Parser, Debug)]
#[command(name = "schemachain")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the database path from the config
    #[arg(short, long, global = true, env = "SCHEMACHAIN_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations
    Apply(ApplyArgs),

    /// Show the schema version and pending migrations
    Status(StatusArgs),

    /// Print the checksum chain of the migration scripts
    Checksums(ChecksumsArgs),
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Commit each migration on its own instead of one transaction
    #[arg(long)]
    pub no_transaction: bool,

    /// Skip the checksum check of already applied migrations
    #[arg(long)]
    pub no_verify: bool,

    /// Re-run every migration from the first one (idempotent scripts only)
    #[arg(long)]
    pub reapply_all: bool,

    /// Skip migration number N (1-based, repeatable)
    #[arg(long, value_name = "N", value_parser = parse_migration_number)]
    pub exclude: Vec<usize>,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print status as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the checksums command
#[derive(Args, Debug)]
pub struct ChecksumsArgs {
    /// Print the chain as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parse a 1-based migration number.
fn parse_migration_number(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("migration numbers start at 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
