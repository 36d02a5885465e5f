use super::*;

fn chain() -> LineageGraph {
    let mut graph = LineageGraph::new();
    graph.add("raw.input", "a");
    graph.add("a", "b");
    graph.add("b", "c");
    graph.add("raw.other", "c");
    graph
}

#[test]
fn test_render_mermaid() {
    let mut graph = LineageGraph::new();
    graph.add("analytics.source_table", "analytics.intermediate_table");
    let rendered = render_mermaid(&graph);
    assert_eq!(
        rendered,
        "flowchart TD\n    t0[\"analytics.intermediate_table\"]\n    t1[\"analytics.source_table\"]\n    t1 --> t0\n"
    );
}

#[test]
fn test_render_mermaid_empty() {
    assert_eq!(render_mermaid(&LineageGraph::new()), "flowchart TD\n");
}

#[test]
fn test_focus_upstream() {
    let focused = focus(&chain(), "b", LineageDirection::Upstream);
    assert_eq!(focused.len(), 2);
    assert!(focused.contains("raw.input", "a"));
    assert!(focused.contains("a", "b"));
}

#[test]
fn test_focus_downstream() {
    let focused = focus(&chain(), "a", LineageDirection::Downstream);
    assert_eq!(focused.len(), 2);
    assert!(focused.contains("a", "b"));
    assert!(focused.contains("b", "c"));
    assert!(!focused.contains("raw.other", "c"));
}

#[test]
fn test_focus_both_and_unknown_table() {
    let focused = focus(&chain(), "b", LineageDirection::Both);
    assert_eq!(focused.len(), 3);
    assert!(focus(&chain(), "nope", LineageDirection::Both).is_empty());
}

#[test]
fn test_neighbour_summary() {
    assert_eq!(
        neighbour_summary(&chain(), "c"),
        "Reads from: b, raw.other\nRead by: (none)\n"
    );
    assert_eq!(
        neighbour_summary(&chain(), "a"),
        "Reads from: raw.input\nRead by: b\n"
    );
}

#[test]
fn test_write_outputs() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sql")).unwrap();
    let config_path = dir.path().join("lineage_config.yml");
    fs::write(
        &config_path,
        "sql_folder_path: sql\nlineage_output: out\nlineage_ui: viewer\n",
    )
    .unwrap();
    let config = LineageConfig::load(&config_path).unwrap();

    let written = write_outputs(&config, &chain()).unwrap();
    assert_eq!(written.len(), 2);

    let markdown = fs::read_to_string(dir.path().join("out").join("lineage.md")).unwrap();
    assert!(markdown.contains("```mermaid\nflowchart TD\n"));
    assert!(markdown.trim_end().ends_with("```"));

    let json: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("viewer").join("lineage.json")).unwrap(),
    )
    .unwrap();
    let edges = json.as_array().unwrap();
    assert_eq!(edges.len(), 4);
    assert_eq!(edges[0]["source"], "a");
    assert_eq!(edges[0]["target"], "b");
}
