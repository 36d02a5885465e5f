//! lq-db - Database layer for Lineq
//!
//! This crate provides the [`QueryExecutor`] trait used by the data-quality
//! runner, a DuckDB implementation, and the [`Backend`] enum that selects a
//! backend from configuration.

pub mod backend;
pub mod duckdb;
pub mod error;
mod row_helpers;
pub mod traits;

pub use backend::Backend;
pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{QueryExecutor, QueryResult};
