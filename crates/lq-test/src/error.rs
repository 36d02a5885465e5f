//! Error types for lq-test

use thiserror::Error;

/// Errors raised while preparing data-quality tests
#[derive(Error, Debug)]
pub enum QualityError {
    /// T001: Custom test template failed to render
    #[error("[T001] Failed to render custom test '{name}': {message}")]
    TemplateError { name: String, message: String },

    /// T002: Custom test directory could not be read
    #[error("[T002] Failed to read custom tests from '{path}': {source}")]
    CustomTestsUnreadable {
        path: String,
        source: std::io::Error,
    },

    /// T003: Database error
    #[error(transparent)]
    Db(#[from] lq_db::DbError),
}

/// Result type alias for QualityError
pub type QualityResult<T> = Result<T, QualityError>;
