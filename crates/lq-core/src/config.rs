//! Configuration types and parsing for the lineage pipeline

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Lineage configuration, usually read from `config.yml`
///
/// The same file may carry keys for other tools (the data-quality runner
/// reads `db_config_path` from it), so unknown keys are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineageConfig {
    /// Directory scanned recursively for `.sql` files
    pub sql_folder_path: String,

    /// Schema prefixed to every target table name (`{file_schema}.{file_stem}`)
    #[serde(rename = "file-schema", alias = "file_schema", default)]
    pub file_schema: Option<String>,

    /// Output directory for rendered lineage artifacts
    #[serde(default = "default_lineage_output")]
    pub lineage_output: String,

    /// Directory holding the UI assets for the interactive viewer
    #[serde(default = "default_lineage_ui")]
    pub lineage_ui: String,

    /// Keep edges where a file reads from its own target table
    #[serde(default)]
    pub include_self_references: bool,

    /// What to do with table references that carry no schema qualifier
    #[serde(default)]
    pub unqualified_tables: UnqualifiedPolicy,

    /// SQL dialect used by the structured parse layer
    #[serde(default)]
    pub dialect: Dialect,

    /// Additional function names that may appear in FROM position
    #[serde(default)]
    pub extra_denylist: Vec<String>,

    /// Drop schema-qualified references whose bare name is a CTE of the same file
    #[serde(default = "default_cte_filter_qualified")]
    pub cte_filter_qualified: bool,

    /// Directory relative paths are resolved against (the config file's parent)
    #[serde(skip)]
    base_dir: PathBuf,
}

/// Policy for schema-less table references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnqualifiedPolicy {
    /// Keep bare names that survive the CTE filter
    #[default]
    Retain,
    /// Drop every bare name
    Drop,
}

/// SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// DuckDB SQL dialect
    #[default]
    DuckDb,
    /// Snowflake SQL dialect
    Snowflake,
    /// PostgreSQL dialect
    Postgres,
    /// Permissive ANSI-ish dialect
    Generic,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::DuckDb => write!(f, "duckdb"),
            Dialect::Snowflake => write!(f, "snowflake"),
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::Generic => write!(f, "generic"),
        }
    }
}

fn default_lineage_output() -> String {
    "output".to_string()
}

fn default_lineage_ui() -> String {
    "ui".to_string()
}

fn default_cte_filter_qualified() -> bool {
    true
}

impl LineageConfig {
    /// Build a config programmatically for a SQL folder
    pub fn new(sql_folder_path: impl Into<String>) -> Self {
        Self {
            sql_folder_path: sql_folder_path.into(),
            file_schema: None,
            lineage_output: default_lineage_output(),
            lineage_ui: default_lineage_ui(),
            include_self_references: false,
            unqualified_tables: UnqualifiedPolicy::default(),
            dialect: Dialect::default(),
            extra_denylist: Vec::new(),
            cte_filter_qualified: default_cte_filter_qualified(),
            base_dir: PathBuf::new(),
        }
    }

    /// Set the schema applied to target table names
    pub fn with_file_schema(mut self, schema: impl Into<String>) -> Self {
        self.file_schema = Some(schema.into());
        self
    }

    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = read_config_file(path)?;
        let mut config: LineageConfig =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Validate and normalize the configuration
    fn validate(&mut self) -> CoreResult<()> {
        if self.sql_folder_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "sql_folder_path cannot be empty".to_string(),
            });
        }

        // An empty `file-schema:` behaves like an absent one
        if self
            .file_schema
            .as_deref()
            .is_some_and(|s| s.trim().is_empty())
        {
            self.file_schema = None;
        }

        Ok(())
    }

    /// Target schema, if configured
    pub fn file_schema(&self) -> Option<&str> {
        self.file_schema.as_deref()
    }

    /// Absolute (or base-relative) SQL folder path
    pub fn sql_folder_absolute(&self) -> PathBuf {
        resolve_path(&self.base_dir, &self.sql_folder_path)
    }

    /// Resolved output directory
    pub fn output_dir_absolute(&self) -> PathBuf {
        resolve_path(&self.base_dir, &self.lineage_output)
    }

    /// Resolved UI asset directory
    pub fn ui_dir_absolute(&self) -> PathBuf {
        resolve_path(&self.base_dir, &self.lineage_ui)
    }
}

/// Read a configuration file, mapping a missing file to `ConfigNotFound`.
pub(crate) fn read_config_file(path: &Path) -> CoreResult<String> {
    if !path.exists() {
        return Err(CoreError::ConfigNotFound {
            path: path.display().to_string(),
        });
    }

    std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_path(base: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
