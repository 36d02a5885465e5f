//! SQL generation for built-in column tests
//!
//! Every built-in compiles to a single aggregate query returning the number
//! of violating rows; the test passes when that count is zero.

use lq_core::sql_utils::{escape_sql_string, quote_ident, quote_qualified};
use lq_core::ColumnTest;

/// Fully quoted `schema.table` reference
fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_qualified(schema), quote_ident(table))
}

/// Count NULL values in a column
pub fn no_nulls_sql(schema: &str, table: &str, column: &str) -> String {
    format!(
        "SELECT COUNT(*) FROM {} WHERE {} IS NULL",
        qualified_table(schema, table),
        quote_ident(column)
    )
}

/// Count values that appear more than once
pub fn unique_sql(schema: &str, table: &str, column: &str) -> String {
    let col = quote_ident(column);
    format!(
        "SELECT COUNT(*) FROM (SELECT {col} FROM {} GROUP BY {col} HAVING COUNT(*) > 1) AS duplicates",
        qualified_table(schema, table)
    )
}

/// Count non-null values outside the accepted list
pub fn accepted_values_sql(schema: &str, table: &str, column: &str, values: &[String]) -> String {
    let col = quote_ident(column);
    let list = values
        .iter()
        .map(|v| format!("'{}'", escape_sql_string(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT COUNT(*) FROM {} WHERE CAST({col} AS VARCHAR) NOT IN ({list}) AND {col} IS NOT NULL",
        qualified_table(schema, table)
    )
}

/// Count values whose string form is longer than `length`
pub fn max_len_sql(schema: &str, table: &str, column: &str, length: u64) -> String {
    format!(
        "SELECT COUNT(*) FROM {} WHERE LENGTH(CAST({} AS VARCHAR)) > {length}",
        qualified_table(schema, table),
        quote_ident(column)
    )
}

/// SQL for a built-in test, or `None` for custom and malformed tests
pub fn builtin_test_sql(
    test: &ColumnTest,
    schema: &str,
    table: &str,
    column: &str,
) -> Option<String> {
    match test {
        ColumnTest::NoNulls => Some(no_nulls_sql(schema, table, column)),
        ColumnTest::Unique => Some(unique_sql(schema, table, column)),
        ColumnTest::AcceptedValues { values } => {
            Some(accepted_values_sql(schema, table, column, values))
        }
        ColumnTest::MaxLen { length } => Some(max_len_sql(schema, table, column, *length)),
        ColumnTest::Custom { .. } | ColumnTest::Malformed { .. } => None,
    }
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
