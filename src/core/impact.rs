//! Change impact analysis
//!
//! Answers "which files are affected if this one changes" by walking import
//! edges backwards from the changed file.

use crate::error::{DepscopeError, OptionExt, Result};
use crate::models::analysis::Impact;
use crate::models::dependency_graph::DependencyGraph;
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Reverse-adjacency index over the internal edges of a graph
///
/// Built once and queried any number of times; queries never mutate it, so
/// a shared reference can be used from several threads.
#[derive(Debug, Clone)]
pub struct ImpactIndex<'g> {
    graph: &'g DependencyGraph,
    positions: HashMap<&'g str, usize>,
    /// Importers of each node, by position, without duplicates
    importers: Vec<Vec<usize>>,
}

impl<'g> ImpactIndex<'g> {
    /// Validate the graph and index its `direct` and `dynamic` edges
    pub fn new(graph: &'g DependencyGraph) -> Result<Self> {
        graph.validate()?;

        let positions = graph.node_positions();
        let mut importers: Vec<Vec<usize>> = vec![Vec::new(); graph.nodes.len()];

        for edge in graph.edges.iter().filter(|e| e.edge_type.is_internal()) {
            // Validation guarantees both endpoints of an internal edge are nodes
            let (Some(&from), Some(&to)) = (
                positions.get(edge.source.as_str()),
                positions.get(edge.target.as_str()),
            ) else {
                continue;
            };
            importers[to].push(from);
        }
        for list in &mut importers {
            list.sort_unstable();
            list.dedup();
        }

        Ok(Self {
            graph,
            positions,
            importers,
        })
    }

    pub fn graph(&self) -> &'g DependencyGraph {
        self.graph
    }

    /// Every transitive dependent of `target` with its shortest hop count
    pub fn impact_of(&self, target: &str) -> Result<Impact> {
        self.traverse(target, None)
    }

    /// Dependents at most `max_hops` edges away from `target`
    pub fn impact_within(&self, target: &str, max_hops: usize) -> Result<Impact> {
        self.traverse(target, Some(max_hops))
    }

    fn traverse(&self, target: &str, max_hops: Option<usize>) -> Result<Impact> {
        let &start = self
            .positions
            .get(target)
            .ok_or_error(|| DepscopeError::unknown_node(target))?;

        let mut distance: Vec<Option<usize>> = vec![None; self.graph.nodes.len()];
        distance[start] = Some(0);
        let mut queue = VecDeque::from([start]);
        let mut dependents = BTreeMap::new();

        while let Some(node) = queue.pop_front() {
            let hops = distance[node].unwrap_or(0);
            if max_hops.is_some_and(|limit| hops >= limit) {
                continue;
            }
            for &importer in &self.importers[node] {
                if distance[importer].is_some() {
                    continue;
                }
                distance[importer] = Some(hops + 1);
                dependents.insert(self.graph.nodes[importer].clone(), hops + 1);
                queue.push_back(importer);
            }
        }

        tracing::debug!(node = %target, dependents = dependents.len(), "impact computed");
        Ok(Impact::new(target, dependents))
    }
}

/// Transitive dependents of `target` mapped to their shortest hop count
pub fn impact_of(graph: &DependencyGraph, target: &str) -> Result<BTreeMap<String, usize>> {
    Ok(ImpactIndex::new(graph)?.impact_of(target)?.dependents)
}
