use super::*;

fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_single_cte() {
    let sql = "WITH orders_cte AS (SELECT * FROM raw.orders) SELECT * FROM orders_cte";
    assert_eq!(extract_cte_names(sql), names(&["orders_cte"]));
}

#[test]
fn test_multiple_ctes_case_insensitive() {
    let sql = "with A as (select 1),\n  B AS(select 2)\nselect * from a join b on true";
    assert_eq!(extract_cte_names(sql), names(&["a", "b"]));
}

#[test]
fn test_comma_without_space() {
    let sql = "WITH a AS (SELECT 1),b AS (SELECT 2),\tc (x, y) AS (SELECT 3, 4) SELECT * FROM b";
    assert_eq!(extract_cte_names(sql), names(&["a", "b", "c"]));
}

#[test]
fn test_recursive_and_column_list() {
    let sql = "WITH RECURSIVE tree (id, parent) AS (SELECT 1, NULL) SELECT * FROM tree";
    assert_eq!(extract_cte_names(sql), names(&["tree"]));
}

#[test]
fn test_materialized_cte() {
    let sql = "WITH cached AS MATERIALIZED (SELECT 1) SELECT * FROM cached";
    assert_eq!(extract_cte_names(sql), names(&["cached"]));
}

#[test]
fn test_commented_definition_rejected() {
    let sql = "-- with fake as (select 1)\nWITH real_one AS (SELECT 1) SELECT * FROM real_one";
    assert_eq!(extract_cte_names(sql), names(&["real_one"]));
}

#[test]
fn test_indented_commented_definition_rejected() {
    let sql = "WITH a AS (SELECT 1)\n    -- , b AS (SELECT 2)\nSELECT * FROM a";
    assert_eq!(extract_cte_names(sql), names(&["a"]));
}

#[test]
fn test_no_ctes() {
    assert!(extract_cte_names("SELECT a, b FROM raw.t").is_empty());
}

#[test]
fn test_default_patterns() {
    let patterns = CtePatterns::default();
    assert!(patterns.is_cte_like("c1"));
    assert!(patterns.is_cte_like("c12_orders"));
    assert!(patterns.is_cte_like("CTE_3"));
    assert!(patterns.is_cte_like("temp_customers"));
    assert!(patterns.is_cte_like("final"));
    assert!(!patterns.is_cte_like("customers"));
    assert!(!patterns.is_cte_like("cte_x"));
    assert!(!patterns.is_cte_like("source_table"));
}

#[test]
fn test_custom_patterns() {
    let patterns = CtePatterns::empty()
        .with_pattern(r"int_\w+")
        .unwrap()
        .with_name("Scratch");
    assert!(patterns.is_cte_like("int_orders"));
    assert!(patterns.is_cte_like("scratch"));
    assert!(!patterns.is_cte_like("c1"));
}

#[test]
fn test_invalid_pattern() {
    let result = CtePatterns::empty().with_pattern("(unclosed");
    assert!(matches!(result, Err(SqlError::InvalidPattern { .. })));
}
