//! Configuration for the data-quality runner
//!
//! Three files are involved: the master config (paths), the database config
//! (backend selection), and a directory of per-table YAML files declaring
//! column tests.

use crate::config::{read_config_file, resolve_path};
use crate::error::{CoreError, CoreResult};
use crate::sql_utils::split_qualified_name;
use crate::testing::{parse_test_definition, ColumnTest, TestDefinition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Master configuration for the data-quality runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Path to the database connection config
    pub db_config_path: String,

    /// Directory with per-table test declarations
    pub table_configs_path: String,

    /// Directory with custom test query templates
    #[serde(default = "default_custom_tests_path")]
    pub custom_tests_path: String,

    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_custom_tests_path() -> String {
    "custom_tests".to_string()
}

impl QualityConfig {
    /// Load the master configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = read_config_file(path)?;
        let mut config: QualityConfig =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Resolved database config path
    pub fn db_config_absolute(&self) -> PathBuf {
        resolve_path(&self.base_dir, &self.db_config_path)
    }

    /// Resolved table config directory
    pub fn table_configs_dir(&self) -> PathBuf {
        resolve_path(&self.base_dir, &self.table_configs_path)
    }

    /// Resolved custom test directory
    pub fn custom_tests_dir(&self) -> PathBuf {
        resolve_path(&self.base_dir, &self.custom_tests_path)
    }

    /// Load the database config referenced by this master config
    pub fn load_database_config(&self) -> CoreResult<DatabaseConfig> {
        DatabaseConfig::load(&self.db_config_absolute())
    }
}

/// Database backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
    /// Snowflake
    Snowflake,
}

impl DbType {
    /// Schema used for unqualified table identifiers
    pub fn default_schema(&self) -> &'static str {
        match self {
            DbType::DuckDb => "main",
            DbType::Snowflake => "PUBLIC",
        }
    }
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
            DbType::Snowflake => write!(f, "snowflake"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Backend type
    #[serde(rename = "type")]
    pub db_type: DbType,

    /// Database file (DuckDB path or `:memory:`)
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Overrides the backend's default schema for unqualified tables
    #[serde(default)]
    pub schema: Option<String>,

    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_database_file() -> String {
    ":memory:".to_string()
}

impl DatabaseConfig {
    /// In-memory DuckDB configuration
    pub fn in_memory() -> Self {
        Self {
            db_type: DbType::DuckDb,
            database_file: default_database_file(),
            schema: None,
            base_dir: PathBuf::new(),
        }
    }

    /// Load the database configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = read_config_file(path)?;
        let mut config: DatabaseConfig =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Database file path resolved against the config location
    pub fn database_path(&self) -> String {
        if self.database_file == ":memory:" {
            return self.database_file.clone();
        }
        resolve_path(&self.base_dir, &self.database_file)
            .display()
            .to_string()
    }

    /// Schema applied to unqualified table identifiers
    pub fn default_schema(&self) -> &str {
        self.schema
            .as_deref()
            .unwrap_or_else(|| self.db_type.default_schema())
    }
}

/// Test declarations for one table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableConfig {
    /// Columns with their tests
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

/// Test declarations for one column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Column name
    pub name: String,

    /// Tests to apply, in order
    #[serde(default)]
    pub tests: Vec<TestDefinition>,
}

impl ColumnConfig {
    /// Resolve the declared tests
    pub fn column_tests(&self) -> Vec<ColumnTest> {
        self.tests.iter().map(parse_test_definition).collect()
    }
}

/// A table identifier (`schema.table` or bare) and its tests
#[derive(Debug, Clone)]
pub struct TableEntry {
    /// Identifier as written in the YAML file
    pub identifier: String,

    /// Column test declarations
    pub config: TableConfig,
}

impl TableEntry {
    /// Split the identifier into `(schema, table)`, using `default_schema`
    /// for bare names.
    pub fn schema_and_table<'a>(&'a self, default_schema: &'a str) -> (&'a str, &'a str) {
        split_qualified_name(&self.identifier, default_schema)
    }
}

/// Load table test declarations from `dir`.
///
/// With an empty `selected` list every `.yml`/`.yaml` file is loaded;
/// otherwise only the named files (extension optional). Naming a file that
/// does not exist is an error. Files that fail to parse are logged and
/// skipped. Later declarations of the same table replace earlier ones.
pub fn load_table_configs(dir: &Path, selected: &[String]) -> CoreResult<Vec<TableEntry>> {
    if !dir.is_dir() {
        return Err(CoreError::TableConfigDirNotFound {
            path: dir.display().to_string(),
        });
    }

    let available = discover_yaml_files(dir)?;

    let files: Vec<&PathBuf> = if selected.is_empty() {
        available.values().collect()
    } else {
        selected
            .iter()
            .map(|name| {
                let stem = Path::new(name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| name.clone());
                available
                    .get(&stem)
                    .ok_or_else(|| CoreError::TableConfigFileNotFound {
                        name: name.clone(),
                        dir: dir.display().to_string(),
                        available: available.keys().cloned().collect::<Vec<_>>().join(", "),
                    })
            })
            .collect::<CoreResult<_>>()?
    };

    let mut entries: Vec<TableEntry> = Vec::new();
    for path in files {
        log::debug!("Loading table config from {}", path.display());
        match parse_table_config_file(path) {
            Ok(parsed) => {
                for entry in parsed {
                    match entries
                        .iter_mut()
                        .find(|e| e.identifier == entry.identifier)
                    {
                        Some(existing) => existing.config = entry.config,
                        None => entries.push(entry),
                    }
                }
            }
            Err(e) => log::error!("Failed to load config file {}: {}", path.display(), e),
        }
    }

    if entries.is_empty() {
        return Err(CoreError::NoTableConfigs {
            dir: dir.display().to_string(),
        });
    }

    log::info!("Loaded configurations for {} tables", entries.len());
    Ok(entries)
}

/// Map of file stem to path for every YAML file directly inside `dir`
fn discover_yaml_files(dir: &Path) -> CoreResult<BTreeMap<String, PathBuf>> {
    let mut files = BTreeMap::new();
    let read_dir = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    for entry in read_dir {
        let path = entry
            .map_err(|e| CoreError::IoWithPath {
                path: dir.display().to_string(),
                source: e,
            })?
            .path();
        if !path.is_file() || !path.extension().is_some_and(|e| e == "yml" || e == "yaml") {
            continue;
        }
        if let Some(stem) = path.file_stem() {
            files.insert(stem.to_string_lossy().to_string(), path);
        }
    }

    Ok(files)
}

/// Parse one table config file, keeping the declaration order of tables
fn parse_table_config_file(path: &Path) -> CoreResult<Vec<TableEntry>> {
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_table_configs_str(&content).map_err(|message| CoreError::ConfigParseError {
        path: path.display().to_string(),
        message,
    })
}

/// Parse table configs from YAML text.
///
/// An empty document yields no entries.
pub fn parse_table_configs_str(content: &str) -> Result<Vec<TableEntry>, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    let mapping = match value {
        serde_yaml::Value::Null => return Ok(Vec::new()),
        serde_yaml::Value::Mapping(m) => m,
        _ => return Err("expected a mapping of table identifiers".to_string()),
    };

    let mut entries = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let identifier = key
            .as_str()
            .ok_or_else(|| "table identifier must be a string".to_string())?
            .to_string();
        let config: TableConfig = if value.is_null() {
            TableConfig::default()
        } else {
            serde_yaml::from_value(value).map_err(|e| format!("{identifier}: {e}"))?
        };
        entries.push(TableEntry { identifier, config });
    }
    Ok(entries)
}

#[cfg(test)]
#[path = "quality_config_test.rs"]
mod tests;
