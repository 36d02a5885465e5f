//! Reading DuckDB rows as strings

use crate::error::{DbError, DbResult};
use crate::traits::QueryResult;

/// Read a column value as a string, trying common types in order
///
/// NULL and unsupported types render as `null`.
pub(crate) fn get_column_as_string(row: &duckdb::Row<'_>, idx: usize) -> String {
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return s;
    }
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return n.to_string();
    }
    if let Ok(Some(f)) = row.get::<_, Option<f64>>(idx) {
        return f.to_string();
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return b.to_string();
    }
    "null".to_string()
}

/// Run `sql` and collect every row.
///
/// DuckDB panics on `column_count()` before a statement has executed, so
/// rows are collected via `query_map` first and column names read after.
pub(crate) fn execute_and_collect(conn: &duckdb::Connection, sql: &str) -> DbResult<QueryResult> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;

    let rows: Vec<Vec<String>> = stmt
        .query_map([], |row| {
            let col_count = row.as_ref().column_count();
            Ok((0..col_count)
                .map(|i| get_column_as_string(row, i))
                .collect())
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let columns = (0..stmt.column_count())
        .map(|i| stmt.column_name(i).map_or("?".to_string(), |v| v.to_string()))
        .collect();

    Ok(QueryResult { columns, rows })
}
