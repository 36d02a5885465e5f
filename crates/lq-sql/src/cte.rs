//! Common table expression name detection
//!
//! Two sources of CTE knowledge feed the extractor: names introduced by
//! `WITH`/comma definitions in the unit itself, and a heuristic set of
//! CTE-like names ([`CtePatterns`]) for aliases whose definition is outside
//! the scanned text.

use crate::error::{SqlError, SqlResult};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

static CTE_DEFINITION: OnceLock<Regex> = OnceLock::new();

fn cte_definition_regex() -> &'static Regex {
    CTE_DEFINITION.get_or_init(|| {
        Regex::new(
            r"(?i)(?:\bwith(?:\s+recursive)?\s+|,\s*)([a-z0-9_]+)\s*(?:\([^()]*\)\s*)?\s+as\s*(?:not\s+)?(?:materialized\s*)?\(",
        )
        .expect("valid regex literal")
    })
}

/// Extract the lower-cased names of CTEs defined in `sql`.
///
/// Recognizes `WITH name AS (`, `WITH RECURSIVE name AS (`, `, name AS (`,
/// and the column-list form `name (a, b) AS (`. A match whose line starts
/// with `--` before the match position is rejected.
pub fn extract_cte_names(sql: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();

    for captures in cte_definition_regex().captures_iter(sql) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if is_in_line_comment(sql, whole.start()) {
            continue;
        }
        names.insert(name.as_str().to_lowercase());
    }

    names
}

/// Whether the text between the start of the line and `pos` opens with `--`
fn is_in_line_comment(sql: &str, pos: usize) -> bool {
    let line_start = sql[..pos].rfind('\n').map_or(0, |i| i + 1);
    sql[line_start..pos].trim_start().starts_with("--")
}

const DEFAULT_CTE_NAME_PATTERNS: &[&str] = &[r"c\d+(?:_[a-z0-9_]+)?", r"cte_\d+", r"temp_[a-z0-9_]+"];

const DEFAULT_CTE_NAMES: &[&str] = &[
    "aggregated",
    "base",
    "cleaned",
    "combined",
    "deduped",
    "enriched",
    "filtered",
    "final",
    "joined",
    "renamed",
    "source",
    "staged",
    "transformed",
    "unioned",
];

static DEFAULT_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

/// Heuristic matcher for names that are almost certainly CTE aliases
///
/// Only consulted for unqualified references.
#[derive(Debug, Clone)]
pub struct CtePatterns {
    patterns: Vec<Regex>,
    names: BTreeSet<String>,
}

impl CtePatterns {
    /// No patterns and no names; nothing is CTE-like
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            names: BTreeSet::new(),
        }
    }

    /// Add a name pattern. The pattern is matched case-insensitively against
    /// the whole name.
    pub fn with_pattern(mut self, pattern: &str) -> SqlResult<Self> {
        self.patterns.push(compile_anchored(pattern)?);
        Ok(self)
    }

    /// Add an exact name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.insert(name.into().to_lowercase());
        self
    }

    /// Whether `name` looks like a CTE alias
    pub fn is_cte_like(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.names.contains(&name) || self.patterns.iter().any(|p| p.is_match(&name))
    }
}

impl Default for CtePatterns {
    fn default() -> Self {
        let patterns = DEFAULT_PATTERNS.get_or_init(|| {
            DEFAULT_CTE_NAME_PATTERNS
                .iter()
                .map(|p| compile_anchored(p).expect("valid regex literal"))
                .collect()
        });
        Self {
            patterns: patterns.clone(),
            names: DEFAULT_CTE_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }
}

fn compile_anchored(pattern: &str) -> SqlResult<Regex> {
    Regex::new(&format!("(?i)^(?:{pattern})$")).map_err(|e| SqlError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "cte_test.rs"]
mod tests;
