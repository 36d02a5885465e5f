//! Error types for lq-core

use thiserror::Error;

/// Core error type for Lineq
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: SQL folder not found
    #[error("[E004] SQL folder not found: {path}")]
    SqlFolderNotFound { path: String },

    /// E005: Table config directory not found
    #[error("[E005] Table config directory not found: {path}")]
    TableConfigDirNotFound { path: String },

    /// E006: Requested table config file is not present
    #[error("[E006] YAML file '{name}' not found in config directory {dir}. Available YAML files: {available}")]
    TableConfigFileNotFound {
        name: String,
        dir: String,
        available: String,
    },

    /// E007: No table configurations could be loaded
    #[error("[E007] No valid table configurations found in {dir}")]
    NoTableConfigs { dir: String },

    /// E008: Empty name where a table or column name is required
    #[error("[E008] Empty name: {context}")]
    EmptyName { context: String },

    /// E009: Circular lineage detected
    #[error("[E009] Circular lineage detected: {cycle}")]
    CircularLineage { cycle: String },

    /// E014: IO error
    #[error("[E014] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E016: IO error with file path context
    #[error("[E016] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
