//! Extraction rules: denylist, stop keywords, and unqualified-name policy

use crate::cte::CtePatterns;
use lq_core::{Dialect, LineageConfig, UnqualifiedPolicy};
use std::collections::BTreeSet;

/// Function and keyword names that can sit in `FROM`/`JOIN` position
/// without being relations.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "array",
    "avg",
    "count",
    "explode",
    "flatten",
    "generate_series",
    "generator",
    "glob",
    "json_array_elements",
    "json_each",
    "json_table",
    "jsonb_each",
    "lateral",
    "max",
    "min",
    "range",
    "read_csv",
    "read_csv_auto",
    "read_json",
    "read_json_auto",
    "read_parquet",
    "regexp_split_to_table",
    "result_scan",
    "select",
    "split_to_table",
    "string_split",
    "sum",
    "table",
    "unnest",
    "values",
];

/// Words that end a `FROM`/`JOIN` capture rather than name a table.
pub const DEFAULT_STOP_KEYWORDS: &[&str] = &[
    "as", "cross", "except", "fetch", "from", "full", "group", "having", "inner", "intersect",
    "join", "left", "limit", "natural", "offset", "on", "order", "outer", "qualify", "right",
    "select", "set", "union", "using", "where", "window", "with",
];

/// Configuration for table reference extraction
///
/// `Default` carries the standard denylist, stop keywords, and CTE patterns;
/// every part can be replaced per instance.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Lower-cased names that are never relations
    pub denylist: BTreeSet<String>,
    /// Lower-cased words rejected as `FROM`/`JOIN` captures
    pub stop_keywords: BTreeSet<String>,
    /// Heuristic CTE alias matcher for unqualified names
    pub cte_patterns: CtePatterns,
    /// Handling of schema-less references
    pub unqualified: UnqualifiedPolicy,
    /// Dialect for the structured parse layer
    pub dialect: Dialect,
    /// Apply the CTE filter to qualified names by their bare name
    pub cte_filter_qualified: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            denylist: to_set(DEFAULT_DENYLIST),
            stop_keywords: to_set(DEFAULT_STOP_KEYWORDS),
            cte_patterns: CtePatterns::default(),
            unqualified: UnqualifiedPolicy::default(),
            dialect: Dialect::default(),
            cte_filter_qualified: true,
        }
    }
}

impl ExtractorConfig {
    /// Derive extraction settings from a lineage configuration
    pub fn from_lineage_config(config: &LineageConfig) -> Self {
        Self::default()
            .with_dialect(config.dialect)
            .with_unqualified(config.unqualified_tables)
            .with_denied(config.extra_denylist.iter().map(String::as_str))
            .with_cte_filter_qualified(config.cte_filter_qualified)
    }

    /// Set the dialect
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the unqualified-name policy
    pub fn with_unqualified(mut self, policy: UnqualifiedPolicy) -> Self {
        self.unqualified = policy;
        self
    }

    /// Whether `raw.orders` is dropped when the unit defines a CTE `orders`
    pub fn with_cte_filter_qualified(mut self, enabled: bool) -> Self {
        self.cte_filter_qualified = enabled;
        self
    }

    /// Add names to the denylist
    pub fn with_denied<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.denylist
            .extend(names.into_iter().map(|n| n.trim().to_lowercase()));
        self
    }

    /// Replace the CTE heuristics
    pub fn with_cte_patterns(mut self, patterns: CtePatterns) -> Self {
        self.cte_patterns = patterns;
        self
    }

    /// Whether a single name part is denylisted
    pub fn is_denied(&self, part: &str) -> bool {
        self.denylist.contains(&part.to_lowercase())
    }

    /// Whether a word terminates a `FROM`/`JOIN` capture
    pub fn is_stop_keyword(&self, word: &str) -> bool {
        self.stop_keywords.contains(&word.to_lowercase())
    }
}

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_denylist() {
        let config = ExtractorConfig::default();
        assert!(config.is_denied("UNNEST"));
        assert!(config.is_denied("values"));
        assert!(!config.is_denied("orders"));
        assert!(config.is_stop_keyword("WHERE"));
        assert!(config.cte_filter_qualified);
    }

    #[test]
    fn test_from_lineage_config() {
        let mut lineage = LineageConfig::new("sql");
        lineage.extra_denylist = vec!["My_Udtf".to_string()];
        lineage.unqualified_tables = UnqualifiedPolicy::Drop;
        lineage.dialect = Dialect::Snowflake;
        lineage.cte_filter_qualified = false;

        let config = ExtractorConfig::from_lineage_config(&lineage);
        assert!(!config.cte_filter_qualified);
        assert!(config.is_denied("my_udtf"));
        assert!(config.is_denied("flatten"));
        assert_eq!(config.unqualified, UnqualifiedPolicy::Drop);
        assert_eq!(config.dialect, Dialect::Snowflake);
    }
}
