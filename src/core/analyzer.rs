//! Repository analysis
//!
//! Runs graph construction, cycle detection and (optionally) whole-repository
//! impact ranking, and gathers the results into an [`AnalysisReport`].

use crate::core::cycles::find_cycles;
use crate::core::impact::ImpactIndex;
use crate::core::parallel::{impact_of_all_with_progress, ProgressUpdate};
use crate::error::Result;
use crate::models::analysis::{AnalysisReport, Impact};
use crate::models::code::Repository;
use crate::models::config::Settings;
use crate::models::dependency_graph::DependencyGraph;
use crate::parsers::dependency_graph_builder::{DependencyGraphBuilder, GraphBuilderConfig};
use crate::utils::path_resolver::ImportResolver;
use std::sync::Arc;

/// Dependency analyzer for repositories
pub struct Analyzer {
    settings: Settings,
    blast_radius: bool,
    resolver: Option<Arc<dyn ImportResolver>>,
}

impl Analyzer {
    /// Create a new analyzer
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            blast_radius: false,
            resolver: None,
        }
    }

    /// Also rank every file by its number of transitive dependents
    pub fn with_blast_radius(mut self, enabled: bool) -> Self {
        self.blast_radius = enabled;
        self
    }

    /// Resolve imports with a custom strategy
    pub fn with_resolver(mut self, resolver: Arc<dyn ImportResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the dependency graph of a repository
    pub fn build_graph(&self, repository: &Repository) -> Result<DependencyGraph> {
        let mut builder = DependencyGraphBuilder::new(GraphBuilderConfig::from(&self.settings));
        if let Some(resolver) = &self.resolver {
            builder = builder.with_resolver(Arc::clone(resolver));
        }
        builder.build(repository)
    }

    /// Analyze a repository
    pub fn analyze(&self, repository: &Repository) -> Result<AnalysisReport> {
        self.analyze_with_progress(repository, |_| {})
    }

    /// Analyze a repository, reporting progress of the blast-radius pass
    pub fn analyze_with_progress<P>(&self, repository: &Repository, progress: P) -> Result<AnalysisReport>
    where
        P: Fn(ProgressUpdate) + Send + Sync,
    {
        let graph = self.build_graph(repository)?;
        let cycles = find_cycles(&graph)?;

        let impacts = if self.blast_radius {
            Some(self.impact_of_all(&graph, progress)?)
        } else {
            None
        };

        let mut report = AnalysisReport::new(
            repository.name.clone(),
            repository.root_path.clone(),
            graph,
            cycles,
        );
        if let Some(impacts) = impacts {
            report = report.with_blast_radius(&impacts);
        }

        tracing::info!(
            repository = %report.repository,
            files = report.statistics.total_nodes,
            edges = report.statistics.total_edges,
            cycles = report.cycles.len(),
            unresolved = report.unresolved_imports.len(),
            "analysis complete"
        );
        Ok(report)
    }

    fn impact_of_all<P>(&self, graph: &DependencyGraph, progress: P) -> Result<Vec<Impact>>
    where
        P: Fn(ProgressUpdate) + Send + Sync,
    {
        if self.settings.parallel {
            return impact_of_all_with_progress(graph, self.settings.threads, progress);
        }

        let index = ImpactIndex::new(graph)?;
        let total = graph.nodes.len();
        graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let impact = index.impact_of(node);
                progress(ProgressUpdate::new(
                    i + 1,
                    total,
                    format!("Analyzed {}/{} files", i + 1, total),
                ));
                impact
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::code::FileNode;

    fn repo() -> Repository {
        let files = vec![
            FileNode::new("a.py", "").unwrap().with_imports(["b", "requests"]),
            FileNode::new("b.py", "").unwrap().with_imports(["c"]),
            FileNode::new("c.py", "").unwrap().with_imports(["a", "missing"]),
            FileNode::new("d.py", "").unwrap().with_imports(["c"]),
        ];
        Repository::new("/repo", files).unwrap().with_name("demo")
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.resolver.external_modules = vec!["requests".to_string()];
        settings
    }

    #[test]
    fn test_analyze() {
        let report = Analyzer::new(settings()).analyze(&repo()).unwrap();
        assert_eq!(report.repository, "demo");
        assert_eq!(report.cycles, vec![vec!["a.py", "b.py", "c.py"]]);
        assert_eq!(report.external_modules.get("requests"), Some(&1));
        assert_eq!(report.unresolved_imports.len(), 1);
        assert!(report.blast_radius.is_none());
    }

    #[test]
    fn test_blast_radius_parallel_and_sequential_agree() {
        let parallel = Analyzer::new(settings())
            .with_blast_radius(true)
            .analyze(&repo())
            .unwrap();

        let mut sequential_settings = settings();
        sequential_settings.parallel = false;
        let sequential = Analyzer::new(sequential_settings)
            .with_blast_radius(true)
            .analyze(&repo())
            .unwrap();

        assert_eq!(parallel.blast_radius, sequential.blast_radius);
        let ranking = parallel.blast_radius.unwrap();
        // a, b and c share a cycle that d imports into; ties rank by path
        let top: Vec<(&str, usize)> = ranking
            .iter()
            .take(3)
            .map(|r| (r.path.as_str(), r.dependents))
            .collect();
        assert_eq!(top, vec![("a.py", 3), ("b.py", 3), ("c.py", 3)]);
        assert_eq!(ranking.last().map(|r| r.path.as_str()), Some("d.py"));
    }

    #[test]
    fn test_invalid_repository_fails() {
        let mut repository = repo();
        repository.files.push(FileNode::new("a.py", "").unwrap());
        let err = Analyzer::new(settings()).analyze(&repository).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
    }
}
