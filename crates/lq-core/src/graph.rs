//! Table-level lineage graph
//!
//! The graph is stored as a set of `(source, target)` edges; nodes are
//! implicit in the edge endpoints. Graph algorithms run on a `petgraph`
//! view built on demand.

use crate::error::{CoreError, CoreResult};
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

/// A directed lineage edge: `target`'s query reads from `source`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Relationship {
    /// Table read by the query
    pub source: String,
    /// Table defined by the SQL file
    pub target: String,
}

impl Relationship {
    /// Create a new edge
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// The set of all relationships found in one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LineageGraph {
    relationships: BTreeSet<Relationship>,
}

impl LineageGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge, returning `false` if it was already present
    pub fn add(&mut self, source: impl Into<String>, target: impl Into<String>) -> bool {
        self.relationships.insert(Relationship::new(source, target))
    }

    /// Check whether an edge exists
    pub fn contains(&self, source: &str, target: &str) -> bool {
        self.relationships
            .iter()
            .any(|r| r.source == source && r.target == target)
    }

    /// Number of edges
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    /// Whether the graph has no edges
    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    /// Edges in sorted order
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    /// Every table mentioned by an edge
    pub fn nodes(&self) -> BTreeSet<&str> {
        self.relationships
            .iter()
            .flat_map(|r| [r.source.as_str(), r.target.as_str()])
            .collect()
    }

    /// Direct sources of a table
    pub fn sources_of(&self, target: &str) -> BTreeSet<&str> {
        self.relationships
            .iter()
            .filter(|r| r.target == target)
            .map(|r| r.source.as_str())
            .collect()
    }

    /// Direct consumers of a table
    pub fn targets_of(&self, source: &str) -> BTreeSet<&str> {
        self.relationships
            .iter()
            .filter(|r| r.source == source)
            .map(|r| r.target.as_str())
            .collect()
    }

    /// All transitive sources of a table
    pub fn upstream(&self, table: &str) -> BTreeSet<String> {
        self.reachable(table, petgraph::Direction::Incoming)
    }

    /// All transitive consumers of a table
    pub fn downstream(&self, table: &str) -> BTreeSet<String> {
        self.reachable(table, petgraph::Direction::Outgoing)
    }

    /// Tables in dependency order (sources first)
    pub fn topological_order(&self) -> CoreResult<Vec<String>> {
        let (graph, _) = self.to_digraph();
        match toposort(&graph, None) {
            Ok(indices) => Ok(indices.into_iter().map(|idx| graph[idx].clone()).collect()),
            Err(cycle) => Err(CoreError::CircularLineage {
                cycle: find_cycle_path(&graph, cycle.node_id()),
            }),
        }
    }

    /// Groups of tables that read from each other, including self-loops
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let (graph, _) = self.to_digraph();
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1 || graph.contains_edge(component[0], component[0])
            })
            .map(|component| {
                let mut names: Vec<String> =
                    component.into_iter().map(|idx| graph[idx].clone()).collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }

    fn reachable(&self, table: &str, direction: petgraph::Direction) -> BTreeSet<String> {
        let (graph, node_map) = self.to_digraph();
        let Some(&start) = node_map.get(table) else {
            return BTreeSet::new();
        };

        let mut result = BTreeSet::new();
        let mut visited = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for edge in graph.edges_directed(current, direction) {
                let neighbor = match direction {
                    petgraph::Direction::Incoming => edge.source(),
                    petgraph::Direction::Outgoing => edge.target(),
                };
                if visited.insert(neighbor) {
                    result.insert(graph[neighbor].clone());
                    stack.push(neighbor);
                }
            }
        }
        result
    }

    fn to_digraph(&self) -> (DiGraph<String, ()>, HashMap<&str, NodeIndex>) {
        let mut graph = DiGraph::new();
        let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();

        for name in self.nodes() {
            let idx = graph.add_node(name.to_string());
            node_map.insert(name, idx);
        }
        for rel in &self.relationships {
            graph.add_edge(
                node_map[rel.source.as_str()],
                node_map[rel.target.as_str()],
                (),
            );
        }

        (graph, node_map)
    }
}

impl FromIterator<Relationship> for LineageGraph {
    fn from_iter<I: IntoIterator<Item = Relationship>>(iter: I) -> Self {
        Self {
            relationships: iter.into_iter().collect(),
        }
    }
}

/// Walk outgoing edges from `start` until a node repeats, for error reporting
fn find_cycle_path(graph: &DiGraph<String, ()>, start: NodeIndex) -> String {
    let mut path: Vec<String> = vec![graph[start].clone()];
    let mut current = start;
    let mut visited = HashSet::from([current]);

    while let Some(edge) = graph.edges(current).next() {
        let target = edge.target();
        path.push(graph[target].clone());

        if target == start || visited.contains(&target) {
            break;
        }

        visited.insert(target);
        current = target;
    }

    path.join(" -> ")
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
