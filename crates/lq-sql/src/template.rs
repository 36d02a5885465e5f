//! Reversible masking of template placeholders and hyphenated identifiers
//!
//! Templated SQL (`{schema}.orders`, `{{ env }}.orders`) and hyphenated
//! project names (`my-project.sales.orders`) defeat identifier regexes.
//! [`MaskedSql`] swaps them for plain identifier tokens and maps matched
//! fragments back to the original text. String literal contents are blanked
//! first so that words inside quotes never look like table names.

use regex::Regex;
use std::sync::OnceLock;

const PLACEHOLDER_PREFIX: &str = "lqtpl";
const HYPHEN_MARK: &str = "__lqh__";

static STRING_LITERAL: OnceLock<Regex> = OnceLock::new();
static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
static HYPHENATED: OnceLock<Regex> = OnceLock::new();
static PLACEHOLDER_TOKEN: OnceLock<Regex> = OnceLock::new();

fn string_literal_regex() -> &'static Regex {
    STRING_LITERAL.get_or_init(|| Regex::new(r"'(?:[^']|'')*'").expect("valid regex literal"))
}

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{\{?[^{}]+\}\}?").expect("valid regex literal"))
}

fn hyphenated_regex() -> &'static Regex {
    HYPHENATED.get_or_init(|| {
        Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*(?:-[A-Za-z0-9_]+)+\b").expect("valid regex literal")
    })
}

fn placeholder_token_regex() -> &'static Regex {
    PLACEHOLDER_TOKEN
        .get_or_init(|| Regex::new(r"lqtpl(\d+)x").expect("valid regex literal"))
}

/// SQL text with placeholders and hyphens replaced by identifier-safe tokens
#[derive(Debug, Clone)]
pub struct MaskedSql {
    text: String,
    placeholders: Vec<String>,
}

impl MaskedSql {
    /// Mask `sql`
    pub fn new(sql: &str) -> Self {
        let without_literals = string_literal_regex().replace_all(sql, "''");
        let mut placeholders = Vec::new();
        let with_tokens = placeholder_regex().replace_all(&without_literals, |caps: &regex::Captures<'_>| {
            let token = format!("{}{}x", PLACEHOLDER_PREFIX, placeholders.len());
            placeholders.push(caps[0].to_string());
            token
        });
        let text = hyphenated_regex()
            .replace_all(&with_tokens, |caps: &regex::Captures<'_>| {
                caps[0].replace('-', HYPHEN_MARK)
            })
            .into_owned();

        Self { text, placeholders }
    }

    /// The masked text to run patterns over
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether any template placeholder was masked
    pub fn has_placeholders(&self) -> bool {
        !self.placeholders.is_empty()
    }

    /// Map a fragment of the masked text back to the original spelling
    pub fn restore(&self, fragment: &str) -> String {
        let restored = placeholder_token_regex().replace_all(fragment, |caps: &regex::Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| self.placeholders.get(idx))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        });
        restored.replace(HYPHEN_MARK, "-")
    }
}

/// Lower-case an identifier, leaving brace-wrapped template text untouched
pub fn lowercase_outside_braces(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    let mut depth = 0usize;
    for c in identifier.chars() {
        match c {
            '{' => {
                depth += 1;
                out.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                out.push(c);
            }
            _ if depth > 0 => out.push(c),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}
