use super::*;

#[test]
fn test_no_nulls_sql() {
    assert_eq!(
        no_nulls_sql("main", "users", "email"),
        r#"SELECT COUNT(*) FROM "main"."users" WHERE "email" IS NULL"#
    );
}

#[test]
fn test_unique_sql_groups_duplicates() {
    let sql = unique_sql("raw", "orders", "id");
    assert!(sql.starts_with("SELECT COUNT(*) FROM (SELECT \"id\" FROM \"raw\".\"orders\""));
    assert!(sql.contains("GROUP BY \"id\" HAVING COUNT(*) > 1"));
}

#[test]
fn test_accepted_values_escapes_literals() {
    let sql = accepted_values_sql(
        "main",
        "people",
        "name",
        &["O'Brien".to_string(), "plain".to_string()],
    );
    assert!(sql.contains("NOT IN ('O''Brien', 'plain')"));
    assert!(sql.ends_with("AND \"name\" IS NOT NULL"));
}

#[test]
fn test_max_len_sql() {
    assert_eq!(
        max_len_sql("main", "codes", "code", 3),
        r#"SELECT COUNT(*) FROM "main"."codes" WHERE LENGTH(CAST("code" AS VARCHAR)) > 3"#
    );
}

#[test]
fn test_identifiers_are_quoted() {
    let sql = no_nulls_sql("db.raw", r#"we"ird"#, "col");
    assert!(sql.contains(r#""db"."raw"."we""ird""#));
}

#[test]
fn test_builtin_test_sql_skips_custom_and_malformed() {
    let custom = ColumnTest::Custom {
        name: "positive".to_string(),
    };
    let malformed = ColumnTest::Malformed {
        name: "max_len".to_string(),
        reason: "missing parameters".to_string(),
    };
    assert!(builtin_test_sql(&custom, "main", "t", "c").is_none());
    assert!(builtin_test_sql(&malformed, "main", "t", "c").is_none());
    assert_eq!(
        builtin_test_sql(&ColumnTest::NoNulls, "main", "t", "c"),
        Some(no_nulls_sql("main", "t", "c"))
    );
}
