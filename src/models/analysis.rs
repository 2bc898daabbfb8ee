//! Analysis result structures

use super::dependency_graph::{DependencyEdge, DependencyGraph, EdgeType, GraphStatistics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Files that transitively depend on a target, with their hop distance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impact {
    pub target: String,
    /// Dependent path -> shortest number of edges from it to the target
    pub dependents: BTreeMap<String, usize>,
}

impl Impact {
    pub fn new(target: impl Into<String>, dependents: BTreeMap<String, usize>) -> Self {
        Self {
            target: target.into(),
            dependents,
        }
    }

    pub fn len(&self) -> usize {
        self.dependents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }

    /// Files importing the target directly
    pub fn direct_dependents(&self) -> Vec<&str> {
        self.dependents
            .iter()
            .filter(|(_, hops)| **hops == 1)
            .map(|(path, _)| path.as_str())
            .collect()
    }

    /// Dependents grouped by distance, nearest first
    pub fn by_distance(&self) -> BTreeMap<usize, Vec<&str>> {
        let mut groups: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
        for (path, hops) in &self.dependents {
            groups.entry(*hops).or_default().push(path.as_str());
        }
        groups
    }

    /// Longest shortest-path distance among dependents (0 when there are none)
    pub fn max_distance(&self) -> usize {
        self.dependents.values().copied().max().unwrap_or(0)
    }
}

/// Size of a file's transitive dependent set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlastRadius {
    pub path: String,
    pub dependents: usize,
    pub direct_dependents: usize,
    pub max_distance: usize,
}

impl From<&Impact> for BlastRadius {
    fn from(impact: &Impact) -> Self {
        Self {
            path: impact.target.clone(),
            dependents: impact.len(),
            direct_dependents: impact.direct_dependents().len(),
            max_distance: impact.max_distance(),
        }
    }
}

/// Complete result of analysing a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub repository: String,
    pub root_path: String,
    pub generated_at: DateTime<Utc>,
    pub graph: DependencyGraph,
    pub statistics: GraphStatistics,
    /// Import cycles over direct edges, each in discovery order
    pub cycles: Vec<Vec<String>>,
    /// Imports that matched neither a file nor a known third-party module
    pub unresolved_imports: Vec<DependencyEdge>,
    /// Third-party module -> number of files importing it
    pub external_modules: BTreeMap<String, usize>,
    /// Files ranked by number of transitive dependents, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blast_radius: Option<Vec<BlastRadius>>,
}

impl AnalysisReport {
    /// Assemble a report from a built graph and its cycles
    pub fn new(
        repository: impl Into<String>,
        root_path: impl Into<String>,
        graph: DependencyGraph,
        cycles: Vec<Vec<String>>,
    ) -> Self {
        let statistics = graph.statistics();
        let unresolved_imports = graph
            .edges_of_type(EdgeType::Unresolved)
            .cloned()
            .collect();
        let mut external_modules = BTreeMap::new();
        for edge in graph.edges_of_type(EdgeType::External) {
            *external_modules.entry(edge.target.clone()).or_insert(0) += 1;
        }

        Self {
            repository: repository.into(),
            root_path: root_path.into(),
            generated_at: Utc::now(),
            graph,
            statistics,
            cycles,
            unresolved_imports,
            external_modules,
            blast_radius: None,
        }
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Attach a blast-radius ranking, largest first, ties by path
    pub fn with_blast_radius(mut self, impacts: &[Impact]) -> Self {
        let mut ranking: Vec<BlastRadius> = impacts.iter().map(BlastRadius::from).collect();
        ranking.sort_by(|a, b| b.dependents.cmp(&a.dependents).then_with(|| a.path.cmp(&b.path)));
        self.blast_radius = Some(ranking);
        self
    }
}
