//! lq-test - Data-quality tests for Lineq
//!
//! This crate turns column test definitions into SQL, runs them against a
//! [`lq_db::QueryExecutor`], and summarizes the outcome per column, per table
//! and for the whole suite.

pub mod custom;
pub mod error;
pub mod generator;
pub mod report;
pub mod runner;

pub use custom::CustomTestLibrary;
pub use error::{QualityError, QualityResult};
pub use generator::{
    accepted_values_sql, builtin_test_sql, max_len_sql, no_nulls_sql, unique_sql,
};
pub use report::{ColumnSummary, SuiteReport, TableSummary};
pub use runner::{TestResult, TestRunner, TestStatus};
