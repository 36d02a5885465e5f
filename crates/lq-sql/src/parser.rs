//! SQL parser wrapper

use crate::dialect::{dialect_for, SqlDialect};
use crate::error::{SqlError, SqlResult};
use lq_core::Dialect;
use sqlparser::ast::Statement;

/// SQL parser that wraps sqlparser-rs with dialect support
pub struct SqlParser {
    dialect: Box<dyn SqlDialect>,
}

impl SqlParser {
    /// Create a parser for a configured dialect
    pub fn new(kind: Dialect) -> Self {
        Self {
            dialect: dialect_for(kind),
        }
    }

    /// Parse SQL into AST statements
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        self.dialect.parse(sql)
    }

    /// Get the dialect name
    pub fn dialect_name(&self) -> &'static str {
        self.dialect.name()
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new(Dialect::DuckDb)
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
