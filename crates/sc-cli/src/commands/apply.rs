//! Apply command implementation

use anyhow::{Context, Result};
use sc_migrate::{ExecutionMode, MigratorOptions};

use crate::cli::{ApplyArgs, GlobalArgs};
use crate::context::ProjectContext;

/// Execute the apply command
pub fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let db = ctx.connect()?;
    let migrator = ctx.migrator(db.as_ref(), options(args, &ctx));
    let source = ctx.source();

    let applied = match migrator.apply(&source) {
        Ok(applied) => applied,
        Err(e) => {
            if e.applied() > 0 {
                eprintln!(
                    "{} migration(s) were committed before the failure",
                    e.applied()
                );
            }
            return Err(anyhow::Error::new(e).context(format!(
                "Failed to apply migrations from {}",
                source.path().display()
            )));
        }
    };

    let current = migrator
        .current_schema_version()
        .context("Failed to read schema version")?;

    if applied == 0 {
        println!("Schema is up to date at version {}", current.version);
    } else {
        println!(
            "Applied {} migration{}; schema at version {}",
            applied,
            if applied == 1 { "" } else { "s" },
            current.version
        );
    }

    Ok(())
}

/// Config options with command-line flags layered on top
fn options(args: &ApplyArgs, ctx: &ProjectContext) -> MigratorOptions {
    let mut options = MigratorOptions::from_config(&ctx.config);

    if args.no_transaction {
        options.mode = ExecutionMode::NonTransactional;
    }
    if args.no_verify {
        options.validate_checksums = false;
    }
    if args.reapply_all {
        options.full_reapply = true;
    }
    options.excluded.extend(args.exclude.iter().copied());

    options
}
