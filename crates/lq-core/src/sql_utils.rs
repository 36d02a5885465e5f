//! SQL identifier quoting utilities
//!
//! Test queries are assembled from configuration values, so identifiers are
//! always quoted and literals always escaped.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and doubles any embedded double
/// quotes.
///
/// # Examples
/// ```
/// use lq_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("users"), r#""users""#);
/// assert_eq!(quote_ident(r#"my"col"#), r#""my""col""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a potentially schema-qualified name (e.g. `schema.table`).
///
/// # Examples
/// ```
/// use lq_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("staging.orders"), r#""staging"."orders""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a potentially schema-qualified table name into (schema, table).
///
/// Uses the last `.` as the separator; bare names get `default_schema`.
///
/// # Examples
/// ```
/// use lq_core::sql_utils::split_qualified_name;
/// assert_eq!(split_qualified_name("users", "main"), ("main", "users"));
/// assert_eq!(split_qualified_name("db.raw.orders", "main"), ("db.raw", "orders"));
/// ```
pub fn split_qualified_name<'a>(name: &'a str, default_schema: &'a str) -> (&'a str, &'a str) {
    match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => (default_schema, name),
    }
}

/// Escape a SQL string literal value by doubling single quotes.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}
