//! Error types for lq-sql

use lq_core::CoreError;
use thiserror::Error;

/// SQL parsing and analysis errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Invalid CTE name pattern (S003)
    #[error("[S003] Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Error from the core layer (file discovery, config)
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
