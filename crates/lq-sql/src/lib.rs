//! lq-sql - SQL analysis layer for Lineq
//!
//! Comment stripping, CTE detection, dialect-aware parsing, the layered
//! table reference extractor, and the lineage graph builder.

pub mod comments;
pub mod cte;
pub mod dialect;
pub mod error;
pub mod extractor;
pub mod lineage;
pub mod parser;
pub mod rules;
pub mod template;

pub use comments::strip_comments;
pub use cte::{extract_cte_names, CtePatterns};
pub use dialect::{dialect_for, SqlDialect};
pub use error::{SqlError, SqlResult};
pub use extractor::{
    AstExtractor, ExtractionChain, FromJoinExtractor, QualifiedPatternExtractor, TableExtractor,
    TableReference,
};
pub use lineage::{build_lineage, LineageBuilder, LineageRun};
pub use parser::SqlParser;
pub use rules::{ExtractorConfig, DEFAULT_DENYLIST, DEFAULT_STOP_KEYWORDS};
