//! Backend selection

use crate::duckdb::DuckDbBackend;
use crate::error::{DbError, DbResult};
use crate::traits::{QueryExecutor, QueryResult};
use async_trait::async_trait;
use lq_core::{DatabaseConfig, DbType};

/// The closed set of backends a run can connect to
pub enum Backend {
    /// DuckDB file or in-memory database
    DuckDb(DuckDbBackend),
}

impl Backend {
    /// Open a connection for a database configuration
    pub fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        log::info!("Connecting to {} database", config.db_type);
        match config.db_type {
            DbType::DuckDb => Ok(Backend::DuckDb(DuckDbBackend::from_config(config)?)),
            DbType::Snowflake => Err(DbError::NotImplemented {
                backend: "snowflake".to_string(),
                feature: "connections".to_string(),
            }),
        }
    }

    fn executor(&self) -> &dyn QueryExecutor {
        match self {
            Backend::DuckDb(db) => db,
        }
    }
}

#[async_trait]
impl QueryExecutor for Backend {
    async fn query(&self, sql: &str) -> DbResult<QueryResult> {
        self.executor().query(sql).await
    }

    async fn query_scalar_i64(&self, sql: &str) -> DbResult<i64> {
        self.executor().query_scalar_i64(sql).await
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.executor().execute_batch(sql).await
    }

    async fn close(&self) -> DbResult<()> {
        self.executor().close().await
    }

    fn default_schema(&self) -> &str {
        self.executor().default_schema()
    }

    fn db_type(&self) -> DbType {
        self.executor().db_type()
    }
}
