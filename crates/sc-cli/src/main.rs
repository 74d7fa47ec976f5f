//! schemachain CLI - apply checksum-chained SQL migrations

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::{Cli, Commands};
use commands::{apply, checksums, status};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Apply(args) => apply::execute(args, &cli.global),
        Commands::Status(args) => status::execute(args, &cli.global),
        Commands::Checksums(args) => checksums::execute(args, &cli.global),
    }
}
