//! Folding per-file extraction results into a lineage graph

use crate::error::SqlResult;
use crate::extractor::ExtractionChain;
use crate::rules::ExtractorConfig;
use lq_core::{discover_sql_files, LineageConfig, LineageGraph, SqlUnit};
use std::path::Path;

/// Outcome of a lineage scan
#[derive(Debug, Clone, Default)]
pub struct LineageRun {
    /// All relationships found
    pub graph: LineageGraph,
    /// Files read and analyzed
    pub files_scanned: usize,
    /// Files that could not be read
    pub files_skipped: usize,
}

impl LineageRun {
    /// No relationships were found. This is a valid result, not an error.
    pub fn is_empty_result(&self) -> bool {
        self.graph.is_empty()
    }
}

/// Builds a [`LineageGraph`] from SQL units
///
/// Each unit contributes `(source, target)` edges where the target comes
/// from the file name and the sources from [`ExtractionChain::extract`].
pub struct LineageBuilder {
    chain: ExtractionChain,
    file_schema: Option<String>,
    include_self_references: bool,
    run: LineageRun,
}

impl LineageBuilder {
    /// Create a builder using the extraction settings from `config`
    pub fn new(config: &LineageConfig) -> Self {
        let chain = ExtractionChain::new(ExtractorConfig::from_lineage_config(config));
        Self::with_chain(config, chain)
    }

    /// Create a builder with a custom extraction chain
    pub fn with_chain(config: &LineageConfig, chain: ExtractionChain) -> Self {
        Self {
            chain,
            file_schema: config.file_schema().map(str::to_string),
            include_self_references: config.include_self_references,
            run: LineageRun::default(),
        }
    }

    /// Add the edges for one unit, returning how many new edges were added
    pub fn add_unit(&mut self, unit: &SqlUnit) -> usize {
        let mut added = 0;
        for source in self.chain.extract(unit.raw_sql()) {
            if !self.include_self_references && is_self_reference(&source, unit) {
                log::debug!("Skipping self-reference {} in {}", source, unit.path().display());
                continue;
            }
            if self.run.graph.add(source, unit.target()) {
                added += 1;
            }
        }
        self.run.files_scanned += 1;
        added
    }

    /// Read and add one file; unreadable files are logged and counted as skipped
    pub fn add_file(&mut self, path: &Path) {
        match SqlUnit::load(path, self.file_schema.as_deref()) {
            Ok(unit) => {
                let added = self.add_unit(&unit);
                log::debug!("{}: {} relationship(s)", path.display(), added);
            }
            Err(e) => {
                log::error!("Error processing {}: {}", path.display(), e);
                self.run.files_skipped += 1;
            }
        }
    }

    /// Scan every `.sql` file under `root` and return the finished run
    pub fn build_from_folder(mut self, root: &Path) -> SqlResult<LineageRun> {
        let files = discover_sql_files(root)?;
        log::info!("Found {} SQL files to process", files.len());

        for path in &files {
            self.add_file(path);
        }

        let run = self.finish();
        log::info!(
            "Found {} relationships in {} files ({} skipped)",
            run.graph.len(),
            run.files_scanned,
            run.files_skipped
        );
        Ok(run)
    }

    /// The run accumulated so far
    pub fn finish(self) -> LineageRun {
        self.run
    }
}

/// Build lineage for the folder named in `config`
pub fn build_lineage(config: &LineageConfig) -> SqlResult<LineageRun> {
    LineageBuilder::new(config).build_from_folder(&config.sql_folder_absolute())
}

fn is_self_reference(source: &str, unit: &SqlUnit) -> bool {
    source == unit.target() || source == unit.stem()
}

#[cfg(test)]
#[path = "lineage_test.rs"]
mod tests;
