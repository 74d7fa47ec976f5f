use super::*;

fn all_dialects() -> Vec<Box<dyn Dialect>> {
    vec![
        Box::new(SqliteDialect),
        Box::new(PostgresDialect),
        Box::new(DuckDbDialect),
    ]
}

#[test]
fn test_every_dialect_targets_the_version_table() {
    for dialect in all_dialects() {
        assert!(
            dialect.create_version_table_query().contains(VERSION_TABLE),
            "{} create query",
            dialect.name()
        );
        assert!(
            dialect.current_version_query().contains(VERSION_TABLE),
            "{} read query",
            dialect.name()
        );
        assert!(
            dialect.save_version_query().contains(VERSION_TABLE),
            "{} save query",
            dialect.name()
        );
    }
}

#[test]
fn test_create_is_idempotent_sql() {
    for dialect in all_dialects() {
        assert!(dialect
            .create_version_table_query()
            .contains("IF NOT EXISTS"));
    }
}

#[test]
fn test_read_query_column_order() {
    for dialect in all_dialects() {
        assert!(dialect
            .current_version_query()
            .contains("SELECT id, version, checksum"));
    }
}

#[test]
fn test_sqlite_uses_insert_or_replace() {
    let sql = SqliteDialect.save_version_query();
    assert!(sql.starts_with("INSERT OR REPLACE"));
    assert!(sql.contains("?1") && sql.contains("?2"));
}

#[test]
fn test_postgres_uses_on_conflict() {
    let sql = PostgresDialect.save_version_query();
    assert!(sql.contains("ON CONFLICT (id)"));
    assert!(sql.contains("$1") && sql.contains("$2"));
}

#[test]
fn test_dialect_kind_roundtrip_names() {
    let kinds = [DialectKind::Sqlite, DialectKind::Postgres, DialectKind::DuckDb];
    for kind in kinds {
        assert_eq!(kind.dialect().name(), kind.to_string());
    }
}

#[test]
fn test_dialect_kind_deserialize() {
    let kind: DialectKind = serde_yaml::from_str("duckdb").unwrap();
    assert_eq!(kind, DialectKind::DuckDb);
    let kind: DialectKind = serde_yaml::from_str("sqlite").unwrap();
    assert_eq!(kind, DialectKind::Sqlite);
    assert!(serde_yaml::from_str::<DialectKind>("mysql").is_err());
}
