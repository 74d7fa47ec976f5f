//! Checksums command implementation

use anyhow::{Context, Result};
use sc_core::{checksum_chain, normalized_sha256};
use sc_migrate::ScriptSource;
use serde::Serialize;

use crate::cli::{ChecksumsArgs, GlobalArgs};
use crate::context::ProjectContext;

/// One link of the chain
#[derive(Debug, Serialize)]
struct ChainEntry {
    version: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    checksum: String,
}

/// Execute the checksums command
///
/// Entry `n` is the checksum recorded after applying the first `n` scripts;
/// no database connection is needed.
pub fn execute(args: &ChecksumsArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let source = ctx.source();

    let files = source.files().context("Failed to list migrations")?;
    let scripts = source.list().context("Failed to read migrations")?;
    let chain = checksum_chain(&scripts, normalized_sha256);

    let entries: Vec<ChainEntry> = chain
        .into_iter()
        .enumerate()
        .map(|(version, checksum)| ChainEntry {
            version,
            file: version
                .checked_sub(1)
                .and_then(|i| files.get(i))
                .and_then(|path| path.file_name())
                .map(|name| name.to_string_lossy().into_owned()),
            checksum,
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{:>4}  {}  {}",
            entry.version,
            entry.checksum,
            entry.file.as_deref().unwrap_or("(empty)")
        );
    }

    Ok(())
}
