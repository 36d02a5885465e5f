//! Table reference extraction
//!
//! Three strategies implement [`TableExtractor`]:
//!
//! 1. [`AstExtractor`] walks a parsed statement tree.
//! 2. [`QualifiedPatternExtractor`] matches schema-qualified names after
//!    `FROM`/`JOIN` and templated `{schema}.table` names anywhere.
//! 3. [`FromJoinExtractor`] captures whatever identifier follows
//!    `FROM`/`JOIN`.
//!
//! [`ExtractionChain`] runs them in that order and keeps the first non-empty
//! result that survives the shared exclusion rules.

use crate::comments::strip_comments;
use crate::cte::extract_cte_names;
use crate::error::SqlResult;
use crate::parser::SqlParser;
use crate::rules::ExtractorConfig;
use crate::template::{lowercase_outside_braces, MaskedSql};
use lq_core::{Dialect, UnqualifiedPolicy};
use regex::Regex;
use sqlparser::ast::{FromTable, ObjectName, Query, Statement, TableFactor, Visit, Visitor};
use std::collections::BTreeSet;
use std::ops::ControlFlow;
use std::sync::OnceLock;

/// A candidate table mention found in SQL text
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableReference {
    /// Everything before the last dot (`db.schema` for three-part names)
    pub schema: Option<String>,
    /// Bare table name
    pub name: String,
}

impl TableReference {
    /// Parse a dotted identifier. Dots inside `{...}` do not split.
    ///
    /// Returns `None` for empty input or empty parts.
    pub fn parse(identifier: &str) -> Option<Self> {
        let identifier = lowercase_outside_braces(identifier.trim());
        let mut parts = split_outside_braces(&identifier);
        if parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        let name = parts.pop()?;
        let schema = (!parts.is_empty()).then(|| parts.join("."));
        Some(Self { schema, name })
    }

    /// Build a reference from already-normalized name parts
    fn from_parts(mut parts: Vec<String>) -> Option<Self> {
        let name = parts.pop()?;
        let schema = (!parts.is_empty()).then(|| parts.join("."));
        Some(Self { schema, name })
    }

    /// Whether the reference carries a schema qualifier
    pub fn is_qualified(&self) -> bool {
        self.schema.is_some()
    }

    /// Each dotted part, schema parts first
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.schema
            .iter()
            .flat_map(|s| split_outside_braces_ref(s))
            .chain(std::iter::once(self.name.as_str()))
    }
}

impl std::fmt::Display for TableReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

fn split_outside_braces(identifier: &str) -> Vec<String> {
    split_outside_braces_ref(identifier)
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn split_outside_braces_ref(identifier: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in identifier.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                parts.push(&identifier[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&identifier[start..]);
    parts
}

/// A strategy for finding table references in comment-free SQL
pub trait TableExtractor: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Find candidate references. `ctes` holds the unit's CTE names.
    ///
    /// An error means the strategy could not handle this input.
    fn extract(&self, sql: &str, ctes: &BTreeSet<String>) -> SqlResult<Vec<TableReference>>;
}

// ===== Structured parse =====

/// Extracts relations from the sqlparser AST
pub struct AstExtractor {
    parser: SqlParser,
}

impl AstExtractor {
    /// Create an extractor for a dialect
    pub fn new(dialect: Dialect) -> Self {
        Self {
            parser: SqlParser::new(dialect),
        }
    }
}

impl TableExtractor for AstExtractor {
    fn name(&self) -> &'static str {
        "ast"
    }

    fn extract(&self, sql: &str, _ctes: &BTreeSet<String>) -> SqlResult<Vec<TableReference>> {
        let statements = self.parser.parse(sql)?;
        let mut collector = RelationCollector::default();
        for statement in &statements {
            let _ = statement.visit(&mut collector);
        }
        Ok(collector.into_references())
    }
}

/// Collects plain relations in table-factor position plus every CTE alias
/// defined anywhere in the tree. Tables written by `UPDATE`, `DELETE`, and
/// `MERGE` are recorded separately and never reported.
#[derive(Default)]
struct RelationCollector {
    relations: Vec<Vec<String>>,
    cte_names: BTreeSet<String>,
    write_targets: BTreeSet<Vec<String>>,
}

impl RelationCollector {
    fn into_references(self) -> Vec<TableReference> {
        let cte_names = self.cte_names;
        let write_targets = self.write_targets;
        self.relations
            .into_iter()
            .filter(|parts| !(parts.len() == 1 && cte_names.contains(&parts[0])))
            .filter(|parts| !write_targets.contains(parts))
            .filter_map(TableReference::from_parts)
            .collect()
    }

    fn add_write_target(&mut self, table_factor: &TableFactor) {
        if let TableFactor::Table { name, .. } = table_factor {
            self.write_targets.extend(name_parts(name));
        }
    }
}

/// Lower-cased identifier parts, `None` when a part is not a plain identifier
fn name_parts(name: &ObjectName) -> Option<Vec<String>> {
    name.0
        .iter()
        .map(|part| part.as_ident().map(|ident| ident.value.to_lowercase()))
        .collect()
}

impl Visitor for RelationCollector {
    type Break = ();

    fn pre_visit_statement(&mut self, statement: &Statement) -> ControlFlow<Self::Break> {
        match statement {
            Statement::Update(update) => self.add_write_target(&update.table.relation),
            Statement::Merge(merge) => self.add_write_target(&merge.table),
            Statement::Delete(delete) if !delete.tables.is_empty() => {
                self.write_targets
                    .extend(delete.tables.iter().filter_map(name_parts));
            }
            Statement::Delete(delete) => {
                let (FromTable::WithFromKeyword(from) | FromTable::WithoutKeyword(from)) =
                    &delete.from;
                for table in from {
                    self.add_write_target(&table.relation);
                }
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.cte_names.insert(cte.alias.name.value.to_lowercase());
            }
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_table_factor(&mut self, table_factor: &TableFactor) -> ControlFlow<Self::Break> {
        // `args` is set for table-valued function calls such as read_csv(...)
        if let TableFactor::Table {
            name, args: None, ..
        } = table_factor
        {
            if let Some(parts) = name_parts(name) {
                self.relations.push(parts);
            }
        }
        ControlFlow::Continue(())
    }
}

// ===== Pattern matching =====

static TEMPLATE_QUALIFIED: OnceLock<Regex> = OnceLock::new();
static FROM_JOIN_TARGET: OnceLock<Regex> = OnceLock::new();
static COMMA_CONTINUATION: OnceLock<Regex> = OnceLock::new();

fn template_qualified_regex() -> &'static Regex {
    TEMPLATE_QUALIFIED.get_or_init(|| {
        Regex::new(r"(?i)\blqtpl\d+x\.[a-z0-9_]+").expect("valid regex literal")
    })
}

fn from_join_target_regex() -> &'static Regex {
    FROM_JOIN_TARGET.get_or_init(|| {
        Regex::new(r"(?i)\b(from|join)\s+([a-z0-9_]+(?:\.[a-z0-9_]+)*)")
            .expect("valid regex literal")
    })
}

/// `[[AS] alias] , next_table` directly after a captured table
fn comma_continuation_regex() -> &'static Regex {
    COMMA_CONTINUATION.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:(?:as\s+)?[a-z0-9_]+\s*)?,\s*([a-z0-9_]+(?:\.[a-z0-9_]+)*)")
            .expect("valid regex literal")
    })
}

/// Functions whose argument syntax contains a `FROM` keyword
const FROM_SYNTAX_FUNCTIONS: &[&str] = &["extract", "overlay", "position", "substring", "trim"];

/// Every table named after `FROM`/`JOIN`, including the rest of a
/// comma-separated `FROM a, b` list.
///
/// Skips function calls, `FROM`s that belong to expression syntax, and the
/// table a `DELETE FROM` removes rows from.
fn clause_targets(text: &str) -> Vec<&str> {
    let mut targets = Vec::new();

    for captures in from_join_target_regex().captures_iter(text) {
        let (Some(keyword), Some(target)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        if keyword.as_str().eq_ignore_ascii_case("from")
            && (keyword_belongs_to_expression(text, keyword.start())
                || last_word(&text[..keyword.start()]).eq_ignore_ascii_case("delete"))
        {
            continue;
        }

        if next_char(text, target.end()) != Some('(') {
            targets.push(target.as_str());
        }

        let mut pos = target.end();
        while let Some(next) = comma_continuation_regex()
            .captures(&text[pos..])
            .and_then(|captures| captures.get(1))
        {
            let (start, end) = (pos + next.start(), pos + next.end());
            if next_char(text, end) != Some('(') {
                targets.push(&text[start..end]);
            }
            pos = end;
        }
    }

    targets
}

/// Matches schema-qualified names, tolerating template placeholders and
/// hyphenated identifiers
#[derive(Debug, Default)]
pub struct QualifiedPatternExtractor;

impl QualifiedPatternExtractor {
    /// Create the extractor
    pub fn new() -> Self {
        Self
    }
}

impl TableExtractor for QualifiedPatternExtractor {
    fn name(&self) -> &'static str {
        "qualified-pattern"
    }

    fn extract(&self, sql: &str, _ctes: &BTreeSet<String>) -> SqlResult<Vec<TableReference>> {
        let masked = MaskedSql::new(sql);
        let text = masked.text();

        let mut references: Vec<TableReference> = clause_targets(text)
            .into_iter()
            .filter(|target| target.contains('.'))
            .filter_map(|target| TableReference::parse(&masked.restore(target)))
            .collect();

        if masked.has_placeholders() {
            for found in template_qualified_regex().find_iter(text) {
                let preceded_by_dot = text[..found.start()].ends_with('.');
                let next = next_char(text, found.end());
                if preceded_by_dot || matches!(next, Some('(') | Some('.')) {
                    continue;
                }
                references.extend(TableReference::parse(&masked.restore(found.as_str())));
            }
        }

        Ok(references)
    }
}

/// Captures the identifier following `FROM`/`JOIN`
#[derive(Debug)]
pub struct FromJoinExtractor {
    rules: ExtractorConfig,
}

impl FromJoinExtractor {
    /// Create the extractor; `rules` supplies the words that end a capture
    pub fn new(rules: ExtractorConfig) -> Self {
        Self { rules }
    }
}

impl TableExtractor for FromJoinExtractor {
    fn name(&self) -> &'static str {
        "from-join"
    }

    fn extract(&self, sql: &str, ctes: &BTreeSet<String>) -> SqlResult<Vec<TableReference>> {
        let masked = MaskedSql::new(sql);
        let mut references = Vec::new();

        for target in clause_targets(masked.text()) {
            if self.rules.is_stop_keyword(target) || ctes.contains(&target.to_lowercase()) {
                continue;
            }
            references.extend(TableReference::parse(&masked.restore(target)));
        }

        Ok(references)
    }
}

/// First non-whitespace character at or after `pos`
fn next_char(text: &str, pos: usize) -> Option<char> {
    text[pos..].chars().find(|c| !c.is_whitespace())
}

/// The identifier immediately before the end of `text`, ignoring trailing
/// whitespace
fn last_word(text: &str) -> &str {
    let trimmed = text.trim_end();
    let start = trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map_or(0, |(idx, c)| idx + c.len_utf8());
    &trimmed[start..]
}

/// Whether a `FROM` at `keyword_start` is part of an expression:
/// `IS DISTINCT FROM`, or the argument list of `EXTRACT(... FROM ...)` and
/// similar functions.
fn keyword_belongs_to_expression(text: &str, keyword_start: usize) -> bool {
    let before = &text[..keyword_start];
    if last_word(before).eq_ignore_ascii_case("distinct") {
        return true;
    }

    let mut depth = 0usize;
    for (idx, c) in before.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' if depth == 0 => {
                let function = last_word(&before[..idx]).to_lowercase();
                return FROM_SYNTAX_FUNCTIONS.contains(&function.as_str());
            }
            '(' => depth -= 1,
            _ => {}
        }
    }
    false
}

// ===== Fallback chain =====

/// Ordered extraction strategies with shared exclusion rules
pub struct ExtractionChain {
    config: ExtractorConfig,
    layers: Vec<Box<dyn TableExtractor>>,
}

impl ExtractionChain {
    /// The standard chain: AST, then qualified patterns, then FROM/JOIN capture
    pub fn new(config: ExtractorConfig) -> Self {
        let layers: Vec<Box<dyn TableExtractor>> = vec![
            Box::new(AstExtractor::new(config.dialect)),
            Box::new(QualifiedPatternExtractor::new()),
            Box::new(FromJoinExtractor::new(config.clone())),
        ];
        Self { config, layers }
    }

    /// A chain with caller-chosen layers
    pub fn with_layers(config: ExtractorConfig, layers: Vec<Box<dyn TableExtractor>>) -> Self {
        Self { config, layers }
    }

    /// The rules this chain filters with
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Layer names in evaluation order
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|layer| layer.name()).collect()
    }

    /// Tables read by `sql`, lower-cased and sorted.
    ///
    /// Never fails: a layer error or an empty filtered result moves on to
    /// the next layer, and an empty set is returned when every layer comes
    /// up empty.
    pub fn extract(&self, sql: &str) -> BTreeSet<String> {
        let stripped = strip_comments(sql);
        let ctes = extract_cte_names(&stripped);

        for layer in &self.layers {
            match layer.extract(&stripped, &ctes) {
                Ok(references) => {
                    let tables: BTreeSet<String> = references
                        .into_iter()
                        .filter(|r| self.is_relation(r, &ctes))
                        .map(|r| r.to_string())
                        .collect();
                    if !tables.is_empty() {
                        log::debug!("{} layer found {} table(s)", layer.name(), tables.len());
                        return tables;
                    }
                    log::debug!("{} layer found no tables", layer.name());
                }
                Err(e) => log::debug!("{} layer failed: {}", layer.name(), e),
            }
        }

        BTreeSet::new()
    }

    /// Shared exclusion rules. A qualified name is CTE-filtered by its bare
    /// name unless `cte_filter_qualified` is off.
    fn is_relation(&self, reference: &TableReference, ctes: &BTreeSet<String>) -> bool {
        if reference.parts().any(|part| self.config.is_denied(part)) {
            return false;
        }
        if ctes.contains(&reference.name)
            && (!reference.is_qualified() || self.config.cte_filter_qualified)
        {
            return false;
        }
        if reference.is_qualified() {
            return true;
        }
        match self.config.unqualified {
            UnqualifiedPolicy::Drop => false,
            UnqualifiedPolicy::Retain => !self.config.cte_patterns.is_cte_like(&reference.name),
        }
    }
}

impl Default for ExtractionChain {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
