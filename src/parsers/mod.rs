//! Turning repository descriptions into dependency graphs
//!
//! Loading of repository documents, import resolution into a symbol table,
//! and graph assembly.

pub mod dependency_graph_builder;
pub mod repository;
pub mod symbol_table;

pub use dependency_graph_builder::{assemble, build_graph, DependencyGraphBuilder, GraphBuilderConfig};
pub use repository::RepositoryParser;
pub use symbol_table::{ImportClassifier, Resolution, SymbolEntry, SymbolTable};
