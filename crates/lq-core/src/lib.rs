//! lq-core - Core library for Lineq
//!
//! Shared configuration types, error types, SQL file discovery, identifier
//! quoting helpers, and the lineage graph used by the other Lineq crates.

pub mod config;
pub mod error;
pub mod graph;
pub mod quality_config;
pub mod sql_unit;
pub mod sql_utils;
pub mod testing;

pub use config::{Dialect, LineageConfig, UnqualifiedPolicy};
pub use error::{CoreError, CoreResult};
pub use graph::{LineageGraph, Relationship};
pub use quality_config::{
    load_table_configs, ColumnConfig, DatabaseConfig, DbType, QualityConfig, TableConfig,
    TableEntry,
};
pub use sql_unit::{discover_sql_files, target_table_name, SqlUnit};
pub use testing::{parse_test_definition, ColumnTest, TestDefinition, BUILTIN_TESTS};
