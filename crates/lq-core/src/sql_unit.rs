//! SQL file discovery and per-file units

use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// One SQL file read from disk
///
/// The target table is derived from the file name, never from the SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlUnit {
    path: PathBuf,
    raw_sql: String,
    target: String,
}

impl SqlUnit {
    /// Read a SQL file and derive its target table name
    pub fn load(path: &Path, file_schema: Option<&str>) -> CoreResult<Self> {
        let raw_sql = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_parts(path, raw_sql, file_schema)
    }

    /// Build a unit from already-loaded SQL text
    pub fn from_parts(
        path: impl Into<PathBuf>,
        raw_sql: impl Into<String>,
        file_schema: Option<&str>,
    ) -> CoreResult<Self> {
        let path = path.into();
        let target =
            target_table_name(&path, file_schema).ok_or_else(|| CoreError::EmptyName {
                context: format!("target table for {}", path.display()),
            })?;
        Ok(Self {
            path,
            raw_sql: raw_sql.into(),
            target,
        })
    }

    /// Source file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File contents as read
    pub fn raw_sql(&self) -> &str {
        &self.raw_sql
    }

    /// Target table identifier (`schema.stem` or bare `stem`)
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Bare target name without any schema prefix
    pub fn stem(&self) -> &str {
        self.target
            .rsplit_once('.')
            .map_or(self.target.as_str(), |(_, stem)| stem)
    }
}

/// Derive the target table name for a SQL file.
///
/// The file stem is lower-cased; with a `file_schema` the result is
/// `{file_schema}.{stem}`.
pub fn target_table_name(path: &Path, file_schema: Option<&str>) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy().trim().to_lowercase();
    if stem.is_empty() {
        return None;
    }
    Some(match file_schema {
        Some(schema) => format!("{}.{}", schema.trim().to_lowercase(), stem),
        None => stem,
    })
}

/// Recursively find `.sql` files under `root` (extension matched
/// case-insensitively), sorted by path.
///
/// Subdirectories that cannot be read are logged and skipped.
pub fn discover_sql_files(root: &Path) -> CoreResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(CoreError::SqlFolderNotFound {
            path: root.display().to_string(),
        });
    }

    let mut files = Vec::new();
    let entries = std::fs::read_dir(root).map_err(|e| CoreError::IoWithPath {
        path: root.display().to_string(),
        source: e,
    })?;
    collect_sql_files(entries, &mut files);
    files.sort();
    Ok(files)
}

fn collect_sql_files(entries: std::fs::ReadDir, files: &mut Vec<PathBuf>) {
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            match std::fs::read_dir(&path) {
                Ok(sub) => collect_sql_files(sub, files),
                Err(e) => log::warn!("Cannot read directory {}: {}", path.display(), e),
            }
            continue;
        }
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"))
        {
            files.push(path);
        }
    }
}

#[cfg(test)]
#[path = "sql_unit_test.rs"]
mod tests;
