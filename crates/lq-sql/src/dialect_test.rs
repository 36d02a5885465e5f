use super::*;

#[test]
fn test_duckdb_parse() {
    let dialect = DuckDbDialect::new();
    let stmts = dialect.parse("SELECT * FROM users").unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_snowflake_parse() {
    let dialect = SnowflakeDialect::new();
    let stmts = dialect.parse("SELECT * FROM raw.users").unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_postgres_parse() {
    let dialect = PostgresDialect::new();
    let stmts = dialect
        .parse("SELECT id FROM public.accounts WHERE id > 1")
        .unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_dialect_for_names() {
    assert_eq!(dialect_for(DialectKind::DuckDb).name(), "duckdb");
    assert_eq!(dialect_for(DialectKind::Snowflake).name(), "snowflake");
    assert_eq!(dialect_for(DialectKind::Postgres).name(), "postgres");
    assert_eq!(dialect_for(DialectKind::Generic).name(), "generic");
}

#[test]
fn test_parse_error_location() {
    let dialect = DuckDbDialect::new();
    let result = dialect.parse("SELECT *\nFROM {schema}.orders");
    match result {
        Err(SqlError::ParseError { line, message, .. }) => {
            assert_eq!(line, 2, "unexpected line in: {}", message);
        }
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_error_location_from_message() {
    assert_eq!(error_location("something odd"), None);
    assert_eq!(error_location("Line: x, Column: 2"), None);
    assert_eq!(
        error_location("Expected: end of statement, found: foo at Line: 3, Column: 14"),
        Some((3, 14))
    );
}
