//! Parallel processing utilities
//!
//! Whole-repository impact analysis runs one breadth-first search per file.
//! The searches share a read-only [`ImpactIndex`] and run on a rayon pool.

use crate::core::impact::ImpactIndex;
use crate::error::{DepscopeError, Result};
use crate::models::analysis::Impact;
use crate::models::dependency_graph::DependencyGraph;
use rayon::prelude::*;
use std::sync::{Arc, Mutex};

/// Progress update information for parallel operations
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressUpdate {
    /// Create a new progress update
    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }

    /// Calculate progress percentage
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64) * 100.0
        }
    }
}

/// Build a rayon pool; `None` sizes it by the number of CPUs
pub fn build_thread_pool(threads: Option<usize>) -> Result<rayon::ThreadPool> {
    let threads = threads.unwrap_or_else(num_cpus::get).max(1);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| DepscopeError::ParallelExecution {
            message: format!("failed to build a pool of {} threads: {}", threads, e),
        })
}

/// Execute a fallible function in parallel with progress reporting
///
/// Results keep the order of `items`. The first error aborts the batch.
pub fn parallel_process_with_progress<T, F, R, P>(
    items: Vec<T>,
    f: F,
    progress_callback: P,
) -> Result<Vec<R>>
where
    T: Send,
    R: Send,
    F: Fn(T) -> Result<R> + Send + Sync,
    P: Fn(ProgressUpdate) + Send + Sync,
{
    let total = items.len();
    let counter = Arc::new(Mutex::new(0usize));

    items
        .into_par_iter()
        .map(|item| {
            let result = f(item);

            let mut count = counter
                .lock()
                .map_err(|_| DepscopeError::ParallelExecution {
                    message: "Failed to lock counter mutex".to_string(),
                })?;
            *count += 1;

            progress_callback(ProgressUpdate::new(
                *count,
                total,
                format!("Analyzed {}/{} files", *count, total),
            ));

            result
        })
        .collect()
}

/// Impact of every node of the graph, in node order
pub fn impact_of_all(graph: &DependencyGraph, threads: Option<usize>) -> Result<Vec<Impact>> {
    impact_of_all_with_progress(graph, threads, |_| {})
}

/// Impact of every node of the graph, reporting each completed node
pub fn impact_of_all_with_progress<P>(
    graph: &DependencyGraph,
    threads: Option<usize>,
    progress_callback: P,
) -> Result<Vec<Impact>>
where
    P: Fn(ProgressUpdate) + Send + Sync,
{
    let index = ImpactIndex::new(graph)?;
    let pool = build_thread_pool(threads)?;
    let targets: Vec<&str> = graph.nodes.iter().map(String::as_str).collect();

    tracing::info!(
        files = targets.len(),
        threads = pool.current_num_threads(),
        "computing impact for every file"
    );

    pool.install(|| {
        parallel_process_with_progress(targets, |target| index.impact_of(target), progress_callback)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::impact::impact_of;
    use crate::models::dependency_graph::EdgeType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample() -> DependencyGraph {
        let mut g = DependencyGraph::new();
        for n in ["a", "b", "c", "d", "e"] {
            g.add_node(n);
        }
        g.add_edge("a", "b", EdgeType::Direct);
        g.add_edge("b", "c", EdgeType::Direct);
        g.add_edge("c", "a", EdgeType::Direct);
        g.add_edge("d", "c", EdgeType::Dynamic);
        g.add_edge("e", "os", EdgeType::External);
        g
    }

    #[test]
    fn test_progress_percentage() {
        assert_eq!(ProgressUpdate::new(1, 4, "x").percentage(), 25.0);
        assert_eq!(ProgressUpdate::new(0, 0, "x").percentage(), 0.0);
    }

    #[test]
    fn test_agrees_with_single_queries() {
        let g = sample();
        let all = impact_of_all(&g, Some(2)).unwrap();
        assert_eq!(all.len(), g.nodes.len());
        for (node, impact) in g.nodes.iter().zip(&all) {
            assert_eq!(&impact.target, node);
            assert_eq!(impact.dependents, impact_of(&g, node).unwrap());
        }
    }

    #[test]
    fn test_progress_reported_for_every_node() {
        let g = sample();
        let calls = AtomicUsize::new(0);
        let last_total = AtomicUsize::new(0);
        impact_of_all_with_progress(&g, Some(3), |update| {
            calls.fetch_add(1, Ordering::SeqCst);
            last_total.store(update.total, Ordering::SeqCst);
        })
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(last_total.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_errors_propagate() {
        let result: Result<Vec<usize>> = parallel_process_with_progress(
            vec![1usize, 2, 3],
            |n| {
                if n == 2 {
                    Err(DepscopeError::unknown_node("two"))
                } else {
                    Ok(n)
                }
            },
            |_| {},
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_graph() {
        assert!(impact_of_all(&DependencyGraph::new(), None).unwrap().is_empty());
    }
}
