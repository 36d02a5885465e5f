//! Lineage command implementation - table-level lineage across SQL files

use anyhow::{Context, Result};
use lq_core::{LineageConfig, LineageGraph};
use lq_sql::build_lineage;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{GlobalArgs, LineageArgs, LineageDirection, LineageOutput};
use crate::commands::common::ExitCode;

/// Execute the lineage command
pub async fn execute(args: &LineageArgs, global: &GlobalArgs) -> Result<()> {
    let config_path = Path::new(&args.config);
    let config = LineageConfig::load(config_path)
        .with_context(|| format!("Failed to load lineage config {}", config_path.display()))?;

    let run = build_lineage(&config).context("Failed to build lineage")?;
    if global.verbose {
        eprintln!(
            "[verbose] Scanned {} file(s), skipped {}",
            run.files_scanned, run.files_skipped
        );
    }

    if run.is_empty_result() {
        eprintln!(
            "No relationships found in {}",
            config.sql_folder_absolute().display()
        );
        if args.strict {
            return Err(ExitCode(1).into());
        }
    }

    let table = args.table.as_deref().map(str::to_lowercase);
    let graph = match &table {
        Some(table) => focus(&run.graph, table, args.direction),
        None => run.graph.clone(),
    };

    match args.output {
        LineageOutput::Table => {
            print_table(&graph);
            if let Some(table) = &table {
                print!("{}", neighbour_summary(&run.graph, table));
            }
        }
        LineageOutput::Json => println!("{}", serde_json::to_string_pretty(&graph)?),
        LineageOutput::Mermaid => print!("{}", render_mermaid(&graph)),
    }

    if args.write {
        for path in write_outputs(&config, &graph)? {
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

/// Keep the edges that lead into and/or out of `table`
pub(crate) fn focus(
    graph: &LineageGraph,
    table: &str,
    direction: LineageDirection,
) -> LineageGraph {
    let mut upstream = graph.upstream(table);
    upstream.insert(table.to_string());
    let mut downstream = graph.downstream(table);
    downstream.insert(table.to_string());

    let keep_up = matches!(
        direction,
        LineageDirection::Upstream | LineageDirection::Both
    );
    let keep_down = matches!(
        direction,
        LineageDirection::Downstream | LineageDirection::Both
    );

    graph
        .relationships()
        .filter(|r| {
            (keep_up && upstream.contains(&r.target))
                || (keep_down && downstream.contains(&r.source))
        })
        .cloned()
        .collect()
}

/// Direct sources and consumers of `table`, one line each
pub(crate) fn neighbour_summary(graph: &LineageGraph, table: &str) -> String {
    let list = |tables: BTreeSet<&str>| {
        if tables.is_empty() {
            "(none)".to_string()
        } else {
            tables.into_iter().collect::<Vec<_>>().join(", ")
        }
    };
    format!(
        "Reads from: {}\nRead by: {}\n",
        list(graph.sources_of(table)),
        list(graph.targets_of(table))
    )
}

/// Print lineage as a human-readable table
fn print_table(graph: &LineageGraph) {
    if graph.is_empty() {
        println!("No lineage relationships found.");
        return;
    }

    let width = graph
        .relationships()
        .map(|r| r.source.len())
        .max()
        .unwrap_or(0)
        .max("SOURCE".len());

    println!("{:<width$}  TARGET", "SOURCE");
    println!("{}", "-".repeat(width + 2 + "TARGET".len().max(20)));
    for rel in graph.relationships() {
        println!("{:<width$}  {}", rel.source, rel.target);
    }

    println!(
        "\n{} relationship(s) across {} table(s).",
        graph.len(),
        graph.nodes().len()
    );

    let cycles = graph.cycles();
    if cycles.is_empty() {
        if let Ok(order) = graph.topological_order() {
            println!("Dependency order: {}", order.join(", "));
        }
    } else {
        for cycle in cycles {
            println!("Warning: circular lineage between {}", cycle.join(", "));
        }
    }
}

/// Render the graph as a Mermaid flowchart.
///
/// Nodes get positional ids so that table names never need escaping in
/// edge lines.
pub(crate) fn render_mermaid(graph: &LineageGraph) -> String {
    let nodes: Vec<&str> = graph.nodes().into_iter().collect();
    let id_of = |name: &str| {
        nodes
            .binary_search(&name)
            .map(|idx| format!("t{idx}"))
            .unwrap_or_default()
    };

    let mut out = String::from("flowchart TD\n");
    for (idx, name) in nodes.iter().enumerate() {
        out.push_str(&format!("    t{idx}[\"{}\"]\n", name.replace('"', "#quot;")));
    }
    for rel in graph.relationships() {
        out.push_str(&format!("    {} --> {}\n", id_of(&rel.source), id_of(&rel.target)));
    }
    out
}

/// Write `lineage.md` and `lineage.json`, returning the paths written
pub(crate) fn write_outputs(config: &LineageConfig, graph: &LineageGraph) -> Result<Vec<PathBuf>> {
    let markdown_dir = config.output_dir_absolute();
    let json_dir = config.ui_dir_absolute();

    let dirs: BTreeSet<&PathBuf> = [&markdown_dir, &json_dir].into_iter().collect();
    for dir in dirs {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let markdown_path = markdown_dir.join("lineage.md");
    let markdown = format!("# Table Lineage\n\n```mermaid\n{}```\n", render_mermaid(graph));
    fs::write(&markdown_path, markdown)
        .with_context(|| format!("Failed to write {}", markdown_path.display()))?;

    let json_path = json_dir.join("lineage.json");
    fs::write(&json_path, serde_json::to_string_pretty(graph)?)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    Ok(vec![markdown_path, json_path])
}

#[cfg(test)]
#[path = "lineage_test.rs"]
mod tests;
