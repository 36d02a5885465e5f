use super::*;
use std::io::Write;

#[test]
fn test_parse_minimal_config() {
    let config: LineageConfig = serde_yaml::from_str("sql_folder_path: ./sql").unwrap();
    assert_eq!(config.sql_folder_path, "./sql");
    assert_eq!(config.file_schema(), None);
    assert_eq!(config.lineage_output, "output");
    assert_eq!(config.lineage_ui, "ui");
    assert!(!config.include_self_references);
    assert_eq!(config.unqualified_tables, UnqualifiedPolicy::Retain);
    assert_eq!(config.dialect, Dialect::DuckDb);
    assert!(config.cte_filter_qualified);
}

#[test]
fn test_parse_hyphenated_file_schema() {
    let yaml = r#"
sql_folder_path: ./sql
file-schema: analytics
"#;
    let config: LineageConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.file_schema(), Some("analytics"));
}

#[test]
fn test_parse_underscored_file_schema_alias() {
    let yaml = r#"
sql_folder_path: ./sql
file_schema: staging
"#;
    let config: LineageConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.file_schema(), Some("staging"));
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
sql_folder_path: ./models
lineage_output: ./out
lineage_ui: ./viewer
include_self_references: true
unqualified_tables: drop
dialect: snowflake
extra_denylist:
  - generate_series
cte_filter_qualified: false
db_config_path: ./db.yml
"#;
    let config: LineageConfig = serde_yaml::from_str(yaml).unwrap();
    assert!(config.include_self_references);
    assert_eq!(config.unqualified_tables, UnqualifiedPolicy::Drop);
    assert_eq!(config.dialect, Dialect::Snowflake);
    assert_eq!(config.extra_denylist, vec!["generate_series"]);
    assert!(!config.cte_filter_qualified);
}

#[test]
fn test_missing_sql_folder_is_error() {
    let result: Result<LineageConfig, _> = serde_yaml::from_str("lineage_output: out");
    assert!(result.is_err());
}

#[test]
fn test_load_resolves_relative_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "sql_folder_path: sql\nfile-schema: \"\"").unwrap();

    let config = LineageConfig::load(&path).unwrap();
    assert_eq!(config.sql_folder_absolute(), dir.path().join("sql"));
    assert_eq!(config.output_dir_absolute(), dir.path().join("output"));
    assert_eq!(config.file_schema(), None);
}

#[test]
fn test_load_missing_file() {
    let err = LineageConfig::load(Path::new("/definitely/not/here.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_invalid_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yml");
    std::fs::write(&path, "sql_folder_path: [unclosed").unwrap();

    let err = LineageConfig::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_load_rejects_blank_sql_folder() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yml");
    std::fs::write(&path, "sql_folder_path: \"  \"").unwrap();

    let err = LineageConfig::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_resolve_absolute_path_untouched() {
    let resolved = resolve_path(Path::new("/base"), "/abs/sql");
    assert_eq!(resolved, PathBuf::from("/abs/sql"));
}

#[test]
fn test_dialect_display() {
    assert_eq!(Dialect::DuckDb.to_string(), "duckdb");
    assert_eq!(Dialect::Postgres.to_string(), "postgres");
}
