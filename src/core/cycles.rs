//! Import cycle detection
//!
//! Tarjan's strongly-connected-components algorithm over `direct` edges,
//! driven by an explicit stack so deep import chains cannot overflow the
//! call stack.

use crate::error::Result;
use crate::models::dependency_graph::{DependencyGraph, EdgeType};

const UNVISITED: usize = usize::MAX;

/// Finds import cycles in a dependency graph
pub struct CycleDetector<'g> {
    graph: &'g DependencyGraph,
    /// Successors by node position, in edge order
    successors: Vec<Vec<usize>>,
    self_loops: Vec<bool>,
}

impl<'g> CycleDetector<'g> {
    /// Validate the graph and index its direct edges
    pub fn new(graph: &'g DependencyGraph) -> Result<Self> {
        graph.validate()?;

        let positions = graph.node_positions();
        let mut successors = vec![Vec::new(); graph.nodes.len()];
        let mut self_loops = vec![false; graph.nodes.len()];

        for edge in graph.edges_of_type(EdgeType::Direct) {
            // Validation guarantees both endpoints of a direct edge are nodes
            let (Some(&from), Some(&to)) = (
                positions.get(edge.source.as_str()),
                positions.get(edge.target.as_str()),
            ) else {
                continue;
            };
            if from == to {
                self_loops[from] = true;
            }
            successors[from].push(to);
        }

        Ok(Self {
            graph,
            successors,
            self_loops,
        })
    }

    /// All cycles, each listed in discovery order
    ///
    /// Components are ordered by the discovery index of their first node.
    pub fn find(&self) -> Vec<Vec<String>> {
        let n = self.graph.nodes.len();
        let mut index = vec![UNVISITED; n];
        let mut low_link = vec![0usize; n];
        let mut on_stack = vec![false; n];
        let mut stack: Vec<usize> = Vec::new();
        let mut next_index = 0usize;
        let mut components: Vec<(usize, Vec<usize>)> = Vec::new();

        // (node, position of the next successor to explore)
        let mut frames: Vec<(usize, usize)> = Vec::new();

        for root in 0..n {
            if index[root] != UNVISITED {
                continue;
            }

            index[root] = next_index;
            low_link[root] = next_index;
            next_index += 1;
            stack.push(root);
            on_stack[root] = true;
            frames.push((root, 0));

            while let Some(frame) = frames.last_mut() {
                let node = frame.0;
                if let Some(&succ) = self.successors[node].get(frame.1) {
                    frame.1 += 1;
                    if index[succ] == UNVISITED {
                        index[succ] = next_index;
                        low_link[succ] = next_index;
                        next_index += 1;
                        stack.push(succ);
                        on_stack[succ] = true;
                        frames.push((succ, 0));
                    } else if on_stack[succ] {
                        low_link[node] = low_link[node].min(index[succ]);
                    }
                    continue;
                }

                frames.pop();
                if let Some(&(parent, _)) = frames.last() {
                    low_link[parent] = low_link[parent].min(low_link[node]);
                }

                if low_link[node] == index[node] {
                    let mut members = Vec::new();
                    while let Some(member) = stack.pop() {
                        on_stack[member] = false;
                        members.push(member);
                        if member == node {
                            break;
                        }
                    }
                    // Stack order is discovery order; popping reversed it
                    members.reverse();

                    if members.len() > 1 || self.self_loops[node] {
                        components.push((index[node], members));
                    }
                }
            }
        }

        components.sort_by_key(|(first, _)| *first);

        let cycles: Vec<Vec<String>> = components
            .into_iter()
            .map(|(_, members)| {
                members
                    .into_iter()
                    .map(|i| self.graph.nodes[i].clone())
                    .collect()
            })
            .collect();

        tracing::info!(
            nodes = n,
            cycles = cycles.len(),
            "cycle detection finished"
        );
        cycles
    }
}

/// Find every import cycle over `direct` edges
pub fn find_cycles(graph: &DependencyGraph) -> Result<Vec<Vec<String>>> {
    Ok(CycleDetector::new(graph)?.find())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dependency_graph::DependencyEdge;
    use petgraph::algo::tarjan_scc;
    use std::collections::BTreeSet;

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
        let mut g = DependencyGraph::new();
        for n in nodes {
            g.add_node(*n);
        }
        for (s, t) in edges {
            g.add_edge(*s, *t, EdgeType::Direct);
        }
        g
    }

    #[test]
    fn test_chain_is_acyclic() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert!(find_cycles(&g).unwrap().is_empty());
    }

    #[test]
    fn test_diamond_is_acyclic() {
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        assert!(find_cycles(&g).unwrap().is_empty());
    }

    #[test]
    fn test_triangle() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        assert_eq!(find_cycles(&g).unwrap(), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_self_edge_is_a_cycle() {
        let g = graph(&["a", "b"], &[("a", "a"), ("a", "b")]);
        assert_eq!(find_cycles(&g).unwrap(), vec![vec!["a"]]);
    }

    #[test]
    fn test_only_direct_edges_count() {
        let mut g = graph(&["a", "b"], &[("a", "b")]);
        g.add_edge("b", "a", EdgeType::Dynamic);
        assert!(find_cycles(&g).unwrap().is_empty());
    }

    #[test]
    fn test_components_ordered_by_discovery() {
        // a -> x <-> y, a -> b <-> c; x is discovered before b
        let g = graph(
            &["a", "b", "c", "x", "y"],
            &[
                ("a", "x"),
                ("a", "b"),
                ("x", "y"),
                ("y", "x"),
                ("b", "c"),
                ("c", "b"),
            ],
        );
        assert_eq!(
            find_cycles(&g).unwrap(),
            vec![vec!["x", "y"], vec!["b", "c"]]
        );
    }

    #[test]
    fn test_malformed_graph_rejected() {
        let mut g = graph(&["a"], &[]);
        g.edges.push(DependencyEdge::new("a", "ghost", EdgeType::Direct));
        let err = find_cycles(&g).unwrap_err();
        assert_eq!(err.kind(), "MalformedGraphError");
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let names: Vec<String> = (0..50_000).map(|i| format!("f{}.py", i)).collect();
        let mut g = DependencyGraph::new();
        g.nodes = names.clone();
        for pair in names.windows(2) {
            g.edges
                .push(DependencyEdge::new(pair[0].clone(), pair[1].clone(), EdgeType::Direct));
        }
        g.edges.push(DependencyEdge::new(
            names[names.len() - 1].clone(),
            names[0].clone(),
            EdgeType::Direct,
        ));
        let cycles = find_cycles(&g).unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), names.len());
        assert_eq!(cycles[0][0], "f0.py");
    }

    #[test]
    fn test_agrees_with_petgraph() {
        let g = graph(
            &["a", "b", "c", "d", "e", "f", "g"],
            &[
                ("a", "b"),
                ("b", "c"),
                ("c", "a"),
                ("c", "d"),
                ("d", "e"),
                ("e", "f"),
                ("f", "d"),
                ("g", "a"),
            ],
        );
        let ours: BTreeSet<BTreeSet<String>> = find_cycles(&g)
            .unwrap()
            .into_iter()
            .map(|c| c.into_iter().collect())
            .collect();

        let (pg, _) = g.to_petgraph();
        let theirs: BTreeSet<BTreeSet<String>> = tarjan_scc(&pg)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| scc.into_iter().map(|i| pg[i].clone()).collect())
            .collect();

        assert_eq!(ours, theirs);
    }
}
