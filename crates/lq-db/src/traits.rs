//! Query executor trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use lq_core::DbType;

/// Rows returned by [`QueryExecutor::query`], every value rendered as a string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Column names in select order
    pub columns: Vec<String>,
    /// Row values; SQL NULL is rendered as `null`
    pub rows: Vec<Vec<String>>,
}

impl QueryResult {
    /// Number of rows returned
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the query returned no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Database access used by the data-quality runner
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a query and collect all rows
    async fn query(&self, sql: &str) -> DbResult<QueryResult>;

    /// Run a query returning a single integer (e.g. `SELECT COUNT(*) ...`)
    async fn query_scalar_i64(&self, sql: &str) -> DbResult<i64>;

    /// Execute one or more statements without results
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Release the connection. Later calls fail with [`crate::DbError::Closed`].
    async fn close(&self) -> DbResult<()>;

    /// Schema used for unqualified table names
    fn default_schema(&self) -> &str;

    /// Backend type
    fn db_type(&self) -> DbType;
}
