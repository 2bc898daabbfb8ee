//! Dependency graph construction from resolved imports

use crate::error::{DepscopeError, Result};
use crate::models::code::{FileNode, Repository};
use crate::models::config::{ResolverConfig, Settings};
use crate::models::dependency_graph::{DependencyEdge, DependencyGraph, EdgeType};
use crate::parsers::symbol_table::SymbolTable;
use crate::utils::path_resolver::ImportResolver;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

/// Configuration for dependency graph building
#[derive(Debug, Clone, Default)]
pub struct GraphBuilderConfig {
    pub resolver: ResolverConfig,
    /// Glob patterns for files left out of the graph
    pub exclude_patterns: Vec<String>,
    /// Refuse repositories with more (non-excluded) files than this
    pub max_nodes: Option<usize>,
}

impl From<&Settings> for GraphBuilderConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            resolver: settings.resolver.clone(),
            exclude_patterns: settings.exclude_patterns.clone(),
            max_nodes: settings.max_nodes,
        }
    }
}

impl From<ResolverConfig> for GraphBuilderConfig {
    fn from(resolver: ResolverConfig) -> Self {
        Self {
            resolver,
            ..Self::default()
        }
    }
}

/// Builds dependency graphs from repositories
pub struct DependencyGraphBuilder {
    config: GraphBuilderConfig,
    resolver: Option<Arc<dyn ImportResolver>>,
}

impl DependencyGraphBuilder {
    /// Create a new dependency graph builder
    pub fn new(config: GraphBuilderConfig) -> Self {
        Self {
            config,
            resolver: None,
        }
    }

    /// Use a custom resolution strategy instead of the configured convention
    pub fn with_resolver(mut self, resolver: Arc<dyn ImportResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn config(&self) -> &GraphBuilderConfig {
        &self.config
    }

    /// Build the dependency graph of a repository
    pub fn build(&self, repository: &Repository) -> Result<DependencyGraph> {
        repository.validate()?;

        let repository = self.apply_exclusions(repository)?;

        if let Some(limit) = self.config.max_nodes {
            if repository.files.len() > limit {
                return Err(DepscopeError::NodeLimitExceeded {
                    count: repository.files.len(),
                    limit,
                });
            }
        }

        let table = match &self.resolver {
            Some(resolver) => {
                SymbolTable::build_with_resolver(&repository, &self.config.resolver, resolver.as_ref())?
            }
            None => SymbolTable::build(&repository, &self.config.resolver)?,
        };

        let graph = assemble(&repository, &table)?;
        tracing::info!(
            repository = %repository.name,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "built dependency graph"
        );
        Ok(graph)
    }

    /// Drop files matching an exclude pattern
    fn apply_exclusions<'a>(&self, repository: &'a Repository) -> Result<Cow<'a, Repository>> {
        if self.config.exclude_patterns.is_empty() {
            return Ok(Cow::Borrowed(repository));
        }

        let patterns = self
            .config
            .exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let files: Vec<FileNode> = repository
            .files
            .iter()
            .filter(|f| {
                let excluded = patterns.iter().any(|p| p.matches(&f.path));
                if excluded {
                    tracing::debug!(file = %f.path, "excluded from graph");
                }
                !excluded
            })
            .cloned()
            .collect();

        Ok(Cow::Owned(Repository {
            root_path: repository.root_path.clone(),
            files,
            name: repository.name.clone(),
        }))
    }
}

/// Assemble a graph from a repository and the symbol table built for it
///
/// Nodes follow repository order; edges follow file order, then import order.
/// Self-imports are skipped and identical edges are emitted once.
pub fn assemble(repository: &Repository, table: &SymbolTable) -> Result<DependencyGraph> {
    let mut graph = DependencyGraph::new();
    let mut seen_nodes = HashSet::with_capacity(repository.files.len());

    for file in &repository.files {
        if !seen_nodes.insert(file.path.as_str()) {
            return Err(DepscopeError::validation(
                format!("duplicate file path '{}'", file.path),
                vec![file.path.clone()],
            ));
        }
        graph.nodes.push(file.path.clone());
    }

    let mut seen_edges: HashSet<DependencyEdge> = HashSet::new();
    for file in &repository.files {
        for raw_import in &file.imports {
            let resolution = table.get(&file.path, raw_import).ok_or_else(|| {
                DepscopeError::validation(
                    format!(
                        "import '{}' of '{}' is missing from the symbol table",
                        raw_import, file.path
                    ),
                    vec![file.path.clone()],
                )
            })?;

            let target = match &resolution.resolved_path {
                Some(path) if *path == file.path => continue,
                Some(path) => path.clone(),
                None => raw_import.trim().to_string(),
            };

            if resolution.edge_type == EdgeType::Unresolved {
                tracing::warn!(file = %file.path, import = %raw_import, "unresolved import");
            }

            let edge = DependencyEdge::new(file.path.clone(), target, resolution.edge_type);
            if seen_edges.insert(edge.clone()) {
                graph.edges.push(edge);
            }
        }
    }

    Ok(graph)
}

/// Build a dependency graph with the default builder settings
pub fn build_graph(repository: &Repository, config: &ResolverConfig) -> Result<DependencyGraph> {
    DependencyGraphBuilder::new(GraphBuilderConfig::from(config.clone())).build(repository)
}
