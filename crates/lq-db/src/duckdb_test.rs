use super::*;

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), DbType::DuckDb);
    assert_eq!(db.default_schema(), "main");
}

#[tokio::test]
async fn test_query_scalar() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE nums AS SELECT * FROM range(10) t(n)")
        .await
        .unwrap();

    let count = db
        .query_scalar_i64("SELECT COUNT(*) FROM nums WHERE n >= 5")
        .await
        .unwrap();
    assert_eq!(count, 5);
}

#[tokio::test]
async fn test_query_scalar_null() {
    let db = DuckDbBackend::in_memory().unwrap();
    let result = db.query_scalar_i64("SELECT CAST(NULL AS BIGINT)").await;
    assert!(matches!(result, Err(DbError::UnexpectedResult(_))));
}

#[tokio::test]
async fn test_query_collects_rows_and_columns() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE users (id INTEGER, name VARCHAR, city VARCHAR);
         INSERT INTO users VALUES (1, 'alice', 'oslo'), (2, NULL, NULL);",
    )
    .await
    .unwrap();

    let result = db
        .query("SELECT id, name, city FROM users ORDER BY id")
        .await
        .unwrap();
    assert_eq!(result.columns, vec!["id", "name", "city"]);
    assert_eq!(result.row_count(), 2);
    assert_eq!(result.rows[0], vec!["1", "alice", "oslo"]);
    assert_eq!(result.rows[1], vec!["2", "null", "null"]);
}

#[tokio::test]
async fn test_query_empty_result() {
    let db = DuckDbBackend::in_memory().unwrap();
    let result = db.query("SELECT 1 AS x WHERE 1 = 0").await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_missing_table_error() {
    let db = DuckDbBackend::in_memory().unwrap();
    let result = db.query_scalar_i64("SELECT COUNT(*) FROM nope").await;
    assert!(matches!(result, Err(DbError::TableNotFound(_))));
}

#[tokio::test]
async fn test_close_is_idempotent_and_final() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.close().await.unwrap();
    db.close().await.unwrap();

    let result = db.query("SELECT 1").await;
    assert!(matches!(result, Err(DbError::Closed)));
}

#[tokio::test]
async fn test_from_path_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quality.duckdb");

    let db = DuckDbBackend::from_path(&path).unwrap();
    db.execute_batch("CREATE TABLE t AS SELECT 42 AS v").await.unwrap();
    db.close().await.unwrap();

    let reopened = DuckDbBackend::new(path.to_str().unwrap()).unwrap();
    let v = reopened.query_scalar_i64("SELECT v FROM t").await.unwrap();
    assert_eq!(v, 42);
}

#[tokio::test]
async fn test_from_config_schema_override() {
    let mut config = DatabaseConfig::in_memory();
    config.schema = Some("analytics".to_string());
    let db = DuckDbBackend::from_config(&config).unwrap();
    assert_eq!(db.default_schema(), "analytics");
}
