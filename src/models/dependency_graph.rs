//! Dependency graph data structures
//!
//! A graph has one node per repository file and one edge per import relation.
//! Edges into files of the repository are `direct` or `dynamic`; edges whose
//! target could not be matched to a file carry the raw import text as target
//! and are typed `external` or `unresolved`.

use crate::error::{DepscopeError, Result};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Kind of import relationship
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum EdgeType {
    /// Plain import of another repository file
    #[default]
    Direct,
    /// Import of another repository file performed at runtime
    Dynamic,
    /// Import of a known third-party module
    External,
    /// Import that matched neither a file nor a known third-party module
    Unresolved,
}

impl EdgeType {
    /// All edge types, in declaration order
    pub const ALL: [EdgeType; 4] = [
        EdgeType::Direct,
        EdgeType::Dynamic,
        EdgeType::External,
        EdgeType::Unresolved,
    ];

    /// Whether edges of this type point at a file inside the repository
    pub fn is_internal(self) -> bool {
        matches!(self, EdgeType::Direct | EdgeType::Dynamic)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeType::Direct => "direct",
            EdgeType::Dynamic => "dynamic",
            EdgeType::External => "external",
            EdgeType::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(EdgeType::Direct),
            "dynamic" => Ok(EdgeType::Dynamic),
            "external" => Ok(EdgeType::External),
            "unresolved" => Ok(EdgeType::Unresolved),
            _ => Err(format!("Invalid edge type: {}", s)),
        }
    }
}

/// An edge in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The importing file
    pub source: String,
    /// The imported file, or the raw import text for external/unresolved edges
    pub target: String,
    #[serde(rename = "type", default)]
    pub edge_type: EdgeType,
}

impl DependencyEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type,
        }
    }
}

/// File-level dependency graph of a repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// File paths, in repository order
    #[serde(default)]
    pub nodes: Vec<String>,
    /// Import relations, in file order then import order
    #[serde(default)]
    pub edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; returns false if it was already present
    pub fn add_node(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.contains_node(&path) {
            return false;
        }
        self.nodes.push(path);
        true
    }

    /// Add an edge unless an identical one (same endpoints and type) exists
    pub fn add_edge(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        edge_type: EdgeType,
    ) -> bool {
        let edge = DependencyEdge::new(source, target, edge_type);
        if self.edges.contains(&edge) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn contains_node(&self, path: &str) -> bool {
        self.nodes.iter().any(|n| n == path)
    }

    /// Position of every node in `nodes`
    pub fn node_positions(&self) -> HashMap<&str, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect()
    }

    /// Edges of a single type, in graph order
    pub fn edges_of_type(&self, edge_type: EdgeType) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter().filter(move |e| e.edge_type == edge_type)
    }

    /// Same nodes, keeping only `direct` edges
    pub fn direct_subgraph(&self) -> DependencyGraph {
        DependencyGraph {
            nodes: self.nodes.clone(),
            edges: self.edges_of_type(EdgeType::Direct).cloned().collect(),
        }
    }

    /// Check the structural invariants of the graph
    ///
    /// Nodes must be unique, every edge source must be a node, and an edge
    /// target may be absent from `nodes` only for external or unresolved edges.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.as_str()) {
                return Err(DepscopeError::malformed_graph(
                    node.as_str(),
                    node.as_str(),
                    "duplicates an existing node",
                ));
            }
        }

        for edge in &self.edges {
            if !seen.contains(edge.source.as_str()) {
                return Err(DepscopeError::malformed_graph(
                    edge.source.as_str(),
                    edge.target.as_str(),
                    "has a source that is not a node",
                ));
            }
            if edge.edge_type.is_internal() && !seen.contains(edge.target.as_str()) {
                return Err(DepscopeError::malformed_graph(
                    edge.source.as_str(),
                    edge.target.as_str(),
                    format!("is typed '{}' but its target is not a node", edge.edge_type),
                ));
            }
        }

        Ok(())
    }

    /// Get statistics about the dependency graph
    pub fn statistics(&self) -> GraphStatistics {
        let mut edges_by_type: HashMap<EdgeType, usize> = HashMap::new();
        for edge in &self.edges {
            *edges_by_type.entry(edge.edge_type).or_insert(0) += 1;
        }

        let mut dependencies: HashMap<&str, HashSet<&str>> = HashMap::new();
        let mut dependents: HashMap<&str, HashSet<&str>> = HashMap::new();
        for edge in self.edges.iter().filter(|e| e.edge_type.is_internal()) {
            dependencies
                .entry(edge.source.as_str())
                .or_default()
                .insert(edge.target.as_str());
            dependents
                .entry(edge.target.as_str())
                .or_default()
                .insert(edge.source.as_str());
        }

        let mut max_fan_in = 0;
        let mut max_fan_out = 0;
        let mut max_fan_in_file = None;
        let mut max_fan_out_file = None;
        let mut isolated_files = 0;

        // Iterate in node order so ties resolve to the earliest file
        for path in &self.nodes {
            let fan_in = dependents.get(path.as_str()).map_or(0, HashSet::len);
            let fan_out = dependencies.get(path.as_str()).map_or(0, HashSet::len);

            if fan_in > max_fan_in {
                max_fan_in = fan_in;
                max_fan_in_file = Some(path.clone());
            }
            if fan_out > max_fan_out {
                max_fan_out = fan_out;
                max_fan_out_file = Some(path.clone());
            }
            if fan_in == 0 && fan_out == 0 {
                isolated_files += 1;
            }
        }

        let count = |t: EdgeType| edges_by_type.get(&t).copied().unwrap_or(0);

        GraphStatistics {
            total_nodes: self.nodes.len(),
            total_edges: self.edges.len(),
            direct_edges: count(EdgeType::Direct),
            dynamic_edges: count(EdgeType::Dynamic),
            external_edges: count(EdgeType::External),
            unresolved_edges: count(EdgeType::Unresolved),
            isolated_files,
            max_fan_in,
            max_fan_in_file,
            max_fan_out,
            max_fan_out_file,
        }
    }

    /// Convert to a petgraph graph
    ///
    /// Node weights are paths (or raw import text for dangling external and
    /// unresolved targets, which are appended after the repository files);
    /// edge weights are edge types.
    pub fn to_petgraph(&self) -> (DiGraph<String, EdgeType>, HashMap<String, NodeIndex>) {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut indices: HashMap<String, NodeIndex> = HashMap::new();

        for node in &self.nodes {
            let idx = graph.add_node(node.clone());
            indices.insert(node.clone(), idx);
        }

        for edge in &self.edges {
            let from = match indices.get(&edge.source) {
                Some(idx) => *idx,
                None => continue,
            };
            let to = *indices
                .entry(edge.target.clone())
                .or_insert_with(|| graph.add_node(edge.target.clone()));
            graph.add_edge(from, to, edge.edge_type);
        }

        (graph, indices)
    }

    /// Export to DOT format for visualization
    pub fn to_dot(&self) -> String {
        let (graph, _) = self.to_petgraph();
        format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}

/// Statistics about the dependency graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub direct_edges: usize,
    pub dynamic_edges: usize,
    pub external_edges: usize,
    pub unresolved_edges: usize,
    /// Files with no internal edges in either direction
    pub isolated_files: usize,
    pub max_fan_in: usize,
    pub max_fan_in_file: Option<String>,
    pub max_fan_out: usize,
    pub max_fan_out_file: Option<String>,
}
