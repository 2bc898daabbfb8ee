//! depscope - file-level dependency graphs for source repositories
//!
//! This library resolves the raw import strings of a repository's files to
//! other files of the same repository, builds the resulting dependency graph,
//! finds import cycles, and computes which files are affected by a change.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod output;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{find_cycles, impact_of, impact_of_all, Analyzer, CycleDetector, ImpactIndex};
pub use error::{DepscopeError, ErrorSeverity, OptionExt, Result, ResultExt};
pub use models::{
    analysis::{AnalysisReport, BlastRadius, Impact},
    code::{ClassNode, FileNode, FunctionNode, Repository},
    config::{ResolutionConvention, ResolverConfig, Settings},
    dependency_graph::{DependencyEdge, DependencyGraph, EdgeType, GraphStatistics},
};
pub use parsers::{build_graph, DependencyGraphBuilder, SymbolTable};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
