//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Lineq - table lineage and data-quality tests for SQL projects
#[derive(Parser, Debug)]
#[command(name = "lq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (info-level logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract table-level lineage from a folder of SQL files
    Lineage(LineageArgs),

    /// Run data-quality tests against a database
    Test(TestArgs),
}

/// Arguments for the lineage command
#[derive(Args, Debug)]
pub struct LineageArgs {
    /// Path to the lineage config file
    #[arg(short, long, default_value = "lineage_config.yml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: LineageOutput,

    /// Write lineage.md and lineage.json to the configured output folders
    #[arg(short, long)]
    pub write: bool,

    /// Fail when no relationships are found
    #[arg(long)]
    pub strict: bool,

    /// Only show lineage around this table
    #[arg(short, long)]
    pub table: Option<String>,

    /// Direction to follow from `--table`
    #[arg(short, long, value_enum, default_value = "both")]
    pub direction: LineageDirection,
}

/// Direction to trace lineage
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineageDirection {
    /// Tables the selected table reads from
    Upstream,
    /// Tables that read from the selected table
    Downstream,
    /// Both directions
    Both,
}

/// Lineage output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineageOutput {
    /// Source/target table
    Table,
    /// JSON relationship list
    Json,
    /// Mermaid flowchart
    Mermaid,
}

/// Arguments for the test command
#[derive(Args, Debug)]
pub struct TestArgs {
    /// Path to the data-quality master config file
    #[arg(short, long, default_value = "dq_config.yml")]
    pub config: String,

    /// Only run these table config files (extension optional)
    #[arg(short, long, num_args = 1..)]
    pub yaml_files: Vec<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
