//! Custom test templates
//!
//! A custom test is a `.sql` file whose stem is the test name. The file is a
//! minijinja template rendered with `schema`, `table_name` (also available as
//! `table`) and `column`; the rendered query must return the violating rows,
//! so the test passes when it returns none.

use crate::error::{QualityError, QualityResult};
use minijinja::{context, Environment};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Custom test templates keyed by name
#[derive(Debug, Clone, Default)]
pub struct CustomTestLibrary {
    templates: BTreeMap<String, String>,
}

impl CustomTestLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.sql` file directly inside `dir`.
    ///
    /// A missing directory is not an error: it is logged and yields an empty
    /// library. Files that cannot be read are logged and skipped.
    pub fn load(dir: &Path) -> QualityResult<Self> {
        let mut library = Self::new();
        if !dir.is_dir() {
            log::warn!(
                "Custom tests directory not found: {}. Only built-in tests are available.",
                dir.display()
            );
            return Ok(library);
        }

        let entries = fs::read_dir(dir).map_err(|source| QualityError::CustomTestsUnreadable {
            path: dir.display().to_string(),
            source,
        })?;

        for entry in entries.flatten() {
            let path = entry.path();
            let is_sql = path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("sql"));
            if !is_sql || !path.is_file() {
                continue;
            }
            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            match fs::read_to_string(&path) {
                Ok(source) => {
                    library.insert(name, source);
                }
                Err(e) => log::error!("Failed to read custom test {}: {}", path.display(), e),
            }
        }

        log::info!(
            "Loaded {} custom test(s) from {}",
            library.len(),
            dir.display()
        );
        Ok(library)
    }

    /// Register a template, replacing any previous one with the same name
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) -> &mut Self {
        self.templates.insert(name.into(), source.into());
        self
    }

    /// Whether a test with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Registered test names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Number of registered tests
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the library has no tests
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Render a test for one column, or `None` if the name is unknown
    pub fn render(
        &self,
        name: &str,
        schema: &str,
        table: &str,
        column: &str,
    ) -> QualityResult<Option<String>> {
        let Some(source) = self.templates.get(name) else {
            return Ok(None);
        };

        let env = Environment::new();
        let rendered = env
            .render_str(
                source,
                context! {
                    schema => schema,
                    table_name => table,
                    table => table,
                    column => column,
                },
            )
            .map_err(|e| QualityError::TemplateError {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(Some(rendered.trim().to_string()))
    }
}

#[cfg(test)]
#[path = "custom_test.rs"]
mod tests;
