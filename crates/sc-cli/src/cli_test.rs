use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_apply_flags() {
    let cli = Cli::try_parse_from([
        "schemachain",
        "apply",
        "--no-transaction",
        "--no-verify",
        "--exclude",
        "2",
        "--exclude",
        "5",
    ])
    .unwrap();

    match cli.command {
        Commands::Apply(args) => {
            assert!(args.no_transaction);
            assert!(args.no_verify);
            assert!(!args.reapply_all);
            assert_eq!(args.exclude, vec![2, 5]);
        }
        other => panic!("expected apply, got {other:?}"),
    }
}

#[test]
fn test_exclude_rejects_zero() {
    let result = Cli::try_parse_from(["schemachain", "apply", "--exclude", "0"]);
    assert!(result.is_err());

    let result = Cli::try_parse_from(["schemachain", "apply", "--exclude", "two"]);
    assert!(result.is_err());
}

#[test]
fn test_global_args_after_subcommand() {
    let cli = Cli::try_parse_from([
        "schemachain",
        "status",
        "--json",
        "-p",
        "proj",
        "--database",
        ":memory:",
        "-v",
    ])
    .unwrap();

    assert!(cli.global.verbose);
    assert_eq!(cli.global.project_dir, "proj");
    assert_eq!(cli.global.database.as_deref(), Some(":memory:"));
    assert!(matches!(cli.command, Commands::Status(StatusArgs { json: true })));
}

#[test]
fn test_defaults() {
    let cli = Cli::try_parse_from(["schemachain", "checksums"]).unwrap();
    assert_eq!(cli.global.project_dir, ".");
    assert!(cli.global.config.is_none());
    assert!(!cli.global.verbose);
}
