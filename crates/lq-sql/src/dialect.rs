//! SQL dialect abstraction

use lq_core::Dialect as DialectKind;
use regex::Regex;
use sqlparser::ast::Statement;
use sqlparser::dialect::{
    Dialect, DuckDbDialect as SqlParserDuckDb, GenericDialect as SqlParserGeneric,
    PostgreSqlDialect as SqlParserPostgres, SnowflakeDialect as SqlParserSnowflake,
};
use sqlparser::parser::Parser;
use std::sync::OnceLock;

use crate::error::{SqlError, SqlResult};

/// Trait for SQL dialect implementations
pub trait SqlDialect: Send + Sync {
    /// Get the underlying sqlparser dialect
    fn parser_dialect(&self) -> &dyn Dialect;

    /// Parse SQL into AST statements
    fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        Parser::parse_sql(self.parser_dialect(), sql).map_err(|e| {
            let msg = e.to_string();
            let (line, column) = error_location(&msg).unwrap_or_default();
            SqlError::ParseError {
                message: msg,
                line,
                column,
            }
        })
    }

    /// Get the dialect name
    fn name(&self) -> &'static str;
}

static ERROR_LOCATION: OnceLock<Regex> = OnceLock::new();

fn error_location_regex() -> &'static Regex {
    ERROR_LOCATION
        .get_or_init(|| Regex::new(r"Line: (\d+), Column: (\d+)").expect("valid regex literal"))
}

/// Location suffix of a `ParserError` message, which carries no structured
/// position.
fn error_location(msg: &str) -> Option<(usize, usize)> {
    let captures = error_location_regex().captures(msg)?;
    let line = captures[1].parse().ok()?;
    let column = captures[2].parse().ok()?;
    Some((line, column))
}

macro_rules! sql_dialect {
    ($(#[$doc:meta])* $name:ident, $inner:ident, $label:literal) => {
        $(#[$doc])*
        pub struct $name {
            dialect: $inner,
        }

        impl $name {
            /// Create the dialect
            pub fn new() -> Self {
                Self { dialect: $inner {} }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl SqlDialect for $name {
            fn parser_dialect(&self) -> &dyn Dialect {
                &self.dialect
            }

            fn name(&self) -> &'static str {
                $label
            }
        }
    };
}

sql_dialect!(
    /// DuckDB SQL dialect
    DuckDbDialect,
    SqlParserDuckDb,
    "duckdb"
);
sql_dialect!(
    /// Snowflake SQL dialect
    SnowflakeDialect,
    SqlParserSnowflake,
    "snowflake"
);
sql_dialect!(
    /// PostgreSQL dialect
    PostgresDialect,
    SqlParserPostgres,
    "postgres"
);
sql_dialect!(
    /// Permissive generic dialect
    GenericDialect,
    SqlParserGeneric,
    "generic"
);

/// Build the dialect implementation for a configured dialect kind
pub fn dialect_for(kind: DialectKind) -> Box<dyn SqlDialect> {
    match kind {
        DialectKind::DuckDb => Box::new(DuckDbDialect::new()),
        DialectKind::Snowflake => Box::new(SnowflakeDialect::new()),
        DialectKind::Postgres => Box::new(PostgresDialect::new()),
        DialectKind::Generic => Box::new(GenericDialect::new()),
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
