//! Integration tests for Lineq

use lq_core::{load_table_configs, LineageConfig, QualityConfig};
use lq_db::{Backend, DbError, DuckDbBackend, QueryExecutor};
use lq_sql::{build_lineage, strip_comments, ExtractionChain};
use lq_test::{CustomTestLibrary, TestRunner, TestStatus};
use std::fs;
use std::path::Path;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// Lineage config on disk, with relative paths resolved against it
#[test]
fn test_lineage_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let sql = dir.path().join("queries");
    fs::create_dir_all(sql.join("marts")).unwrap();
    write(&sql, "source_table.sql", "SELECT * FROM raw_data.input_table");
    write(
        &sql,
        "intermediate_table.sql",
        "-- doubles every value\nSELECT id, value * 2 AS doubled FROM analytics.source_table",
    );
    write(
        &sql.join("marts"),
        "final_table.sql",
        "WITH base AS (SELECT * FROM analytics.intermediate_table)\n\
         SELECT b.id FROM base b JOIN analytics.source_table s ON b.id = s.id",
    );
    write(
        dir.path(),
        "lineage_config.yml",
        "sql_folder_path: queries\nfile-schema: analytics\n",
    );

    let config = LineageConfig::load(&dir.path().join("lineage_config.yml")).unwrap();
    let run = build_lineage(&config).unwrap();

    assert_eq!(run.files_scanned, 3);
    assert_eq!(run.graph.len(), 4);
    assert!(run
        .graph
        .contains("raw_data.input_table", "analytics.source_table"));
    assert!(run
        .graph
        .contains("analytics.source_table", "analytics.intermediate_table"));
    assert!(run
        .graph
        .contains("analytics.intermediate_table", "analytics.final_table"));
    assert!(run
        .graph
        .contains("analytics.source_table", "analytics.final_table"));
    assert_eq!(
        run.graph.topological_order().unwrap(),
        vec![
            "raw_data.input_table",
            "analytics.source_table",
            "analytics.intermediate_table",
            "analytics.final_table",
        ]
    );
}

#[test]
fn test_empty_folder_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = LineageConfig::new(dir.path().display().to_string());
    let run = build_lineage(&config).unwrap();
    assert!(run.is_empty_result());
    assert_eq!(run.files_scanned, 0);
}

#[test]
fn test_comment_stripping_does_not_change_extraction() {
    let chain = ExtractionChain::default();
    let samples = [
        "SELECT * FROM a.b /* JOIN c.d */ JOIN e.f ON true -- FROM g.h",
        "WITH x AS (SELECT 1 FROM s.t) -- trailing\nSELECT * FROM x",
        "SELECT '-- not a comment' AS c FROM raw.things",
    ];
    for sql in samples {
        assert_eq!(chain.extract(&strip_comments(sql)), chain.extract(sql), "{sql}");
    }
}

#[tokio::test]
async fn test_quality_suite_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("warehouse.duckdb");
    {
        let db = DuckDbBackend::from_path(&db_path).unwrap();
        db.execute_batch(
            "CREATE SCHEMA watchpup;
             CREATE TABLE watchpup.cheese (id INTEGER, age VARCHAR, weight INTEGER);
             INSERT INTO watchpup.cheese VALUES (1, 'old', 5), (2, 'fresh', 7), (2, 'moldy', -1);",
        )
        .await
        .unwrap();
        db.close().await.unwrap();
    }

    let tables_dir = dir.path().join("tables");
    let custom_dir = dir.path().join("custom_tests");
    fs::create_dir_all(&tables_dir).unwrap();
    fs::create_dir_all(&custom_dir).unwrap();

    write(
        dir.path(),
        "db_config.yml",
        "type: duckdb\ndatabase_file: warehouse.duckdb\n",
    );
    write(
        dir.path(),
        "dq_config.yml",
        "db_config_path: db_config.yml\ntable_configs_path: tables\n",
    );
    write(
        &tables_dir,
        "cheese.yml",
        r#"
watchpup.cheese:
  columns:
    - name: id
      tests:
        - no_nulls
        - unique
    - name: age
      tests:
        - accepted_values: [old, fresh]
        - max_len: 5
    - name: weight
      tests:
        - positive
        - does_not_exist
"#,
    );
    write(
        &custom_dir,
        "positive.sql",
        "SELECT * FROM {{ schema }}.{{ table_name }} WHERE {{ column }} <= 0",
    );

    let config = QualityConfig::load(&dir.path().join("dq_config.yml")).unwrap();
    let db_config = config.load_database_config().unwrap();
    let backend = Backend::connect(&db_config).unwrap();
    let tables = load_table_configs(&config.table_configs_dir(), &[]).unwrap();
    let library = CustomTestLibrary::load(&config.custom_tests_dir()).unwrap();
    assert!(library.contains("positive"));

    let runner = TestRunner::new(&backend, &library);
    let report = runner.run_suite(&tables).await;

    assert_eq!(report.total(), 6);
    assert_eq!(report.passed(), 2);
    assert_eq!(report.failed(), 4);

    let statuses: Vec<(&str, TestStatus)> = report
        .results()
        .map(|r| (r.test.as_str(), r.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("no_nulls", TestStatus::Passed),
            ("unique", TestStatus::Failed),
            ("accepted_values: [old, fresh]", TestStatus::Failed),
            ("max_len: 5", TestStatus::Passed),
            ("positive", TestStatus::Failed),
            ("does_not_exist", TestStatus::Failed),
        ]
    );

    // The suite closes the connection when it finishes
    let err = backend.query("SELECT 1").await.unwrap_err();
    assert!(matches!(err, DbError::Closed));
}

#[test]
fn test_missing_table_config_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "users.yml", "main.users:\n  columns: []\n");

    let err = load_table_configs(dir.path(), &["orders".to_string()]).unwrap_err();
    assert!(err.to_string().contains("users"));
}
