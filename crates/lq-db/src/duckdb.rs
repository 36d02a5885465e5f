//! DuckDB query executor

use crate::error::{DbError, DbResult};
use crate::row_helpers::execute_and_collect;
use crate::traits::{QueryExecutor, QueryResult};
use async_trait::async_trait;
use duckdb::Connection;
use lq_core::{DatabaseConfig, DbType};
use std::path::Path;
use std::sync::Mutex;

/// DuckDB database backend
///
/// The connection lives behind a `Mutex<Option<_>>` so that [`close`] can
/// release it through a shared reference.
///
/// [`close`]: QueryExecutor::close
pub struct DuckDbBackend {
    conn: Mutex<Option<Connection>>,
    default_schema: String,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Open the database described by a config file
    pub fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        let backend = Self::new(&config.database_path())?;
        Ok(backend.with_default_schema(config.default_schema()))
    }

    /// Override the schema used for unqualified table names
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = schema.into();
        self
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
            default_schema: DbType::DuckDb.default_schema().to_string(),
        }
    }

    /// Run `f` against the open connection
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> DbResult<T>) -> DbResult<T> {
        let guard = self
            .conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
        let conn = guard.as_ref().ok_or(DbError::Closed)?;
        f(conn)
    }

    fn query_scalar_sync(&self, sql: &str) -> DbResult<i64> {
        self.with_conn(|conn| {
            let value: Option<i64> = conn.query_row(sql, [], |row| row.get(0))?;
            value.ok_or_else(|| DbError::UnexpectedResult(format!("NULL scalar from: {}", sql)))
        })
    }

    fn close_sync(&self) -> DbResult<()> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
        match guard.take() {
            Some(conn) => conn
                .close()
                .map_err(|(_, e)| DbError::ConnectionError(e.to_string())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QueryExecutor for DuckDbBackend {
    async fn query(&self, sql: &str) -> DbResult<QueryResult> {
        self.with_conn(|conn| execute_and_collect(conn, sql))
    }

    async fn query_scalar_i64(&self, sql: &str) -> DbResult<i64> {
        self.query_scalar_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.with_conn(|conn| {
            conn.execute_batch(sql)
                .map_err(|e| DbError::ExecutionError(e.to_string()))
        })
    }

    async fn close(&self) -> DbResult<()> {
        self.close_sync()
    }

    fn default_schema(&self) -> &str {
        &self.default_schema
    }

    fn db_type(&self) -> DbType {
        DbType::DuckDb
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
