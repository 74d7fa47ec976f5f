//! Status command implementation

use anyhow::{bail, Context, Result};
use sc_migrate::MigratorOptions;

use crate::cli::{GlobalArgs, StatusArgs};
use crate::context::ProjectContext;

/// Execute the status command
///
/// Fails when `apply` would refuse to run: the database is ahead of the
/// scripts, or the recorded checksum no longer matches them while
/// `verify_checksums` is on. Drift with verification off is only a warning.
pub fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let db = ctx.connect()?;
    let migrator = ctx.migrator(db.as_ref(), MigratorOptions::from_config(&ctx.config));
    let source = ctx.source();

    let status = migrator
        .status(&source)
        .context("Failed to read migration status")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("Database:   {} ({})", ctx.database, ctx.dialect());
        println!("Migrations: {}", source.path().display());
        println!(
            "Version:    {} of {}",
            status.current.version, status.available
        );
        if !status.current.is_initial() {
            println!("Checksum:   {}", status.current.checksum);
        }

        if status.pending.is_empty() {
            println!("Pending:    none");
        } else {
            let pending: Vec<String> = status.pending.iter().map(|n| n.to_string()).collect();
            println!("Pending:    {}", pending.join(", "));
        }
    }

    if status.is_overrun() {
        bail!(
            "Database version ({}) exceeds available migrations ({})",
            status.current.version,
            status.available
        );
    }
    if !status.checksum_valid {
        if status.checksum_enforced {
            bail!(
                "Schema integrity check failed: applied migrations differ from {}",
                source.path().display()
            );
        }
        log::warn!(
            "Applied migrations differ from {} (checksum verification is off)",
            source.path().display()
        );
    }

    Ok(())
}
