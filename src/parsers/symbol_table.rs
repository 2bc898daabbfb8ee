//! Symbol table: what every import of every file resolves to
//!
//! Built from a repository and an [`ImportResolver`]; classifies each raw
//! import as a repository file (`direct`/`dynamic`), a known third-party
//! module (`external`) or neither (`unresolved`).

use crate::error::Result;
use crate::models::code::Repository;
use crate::models::config::ResolverConfig;
use crate::models::dependency_graph::EdgeType;
use crate::utils::path_resolver::{top_level_name, ImportResolver, PathResolver};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Outcome of resolving one raw import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Repository path the import refers to, when it is internal
    pub resolved_path: Option<String>,
    pub edge_type: EdgeType,
}

impl Resolution {
    pub fn internal(path: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            resolved_path: Some(path.into()),
            edge_type,
        }
    }

    pub fn external() -> Self {
        Self {
            resolved_path: None,
            edge_type: EdgeType::External,
        }
    }

    pub fn unresolved() -> Self {
        Self {
            resolved_path: None,
            edge_type: EdgeType::Unresolved,
        }
    }
}

/// One `(source_path, raw_import)` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub source: String,
    pub raw_import: String,
    pub resolution: Resolution,
}

/// Decides edge types from the raw import text
#[derive(Debug, Clone)]
pub struct ImportClassifier {
    external_modules: HashSet<String>,
    dynamic_patterns: Vec<glob::Pattern>,
}

impl ImportClassifier {
    /// Compile the classifier; fails on an invalid dynamic-import glob
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let dynamic_patterns = config
            .dynamic_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            external_modules: config.external_modules.iter().cloned().collect(),
            dynamic_patterns,
        })
    }

    /// Classify a raw import given what the resolver found for it
    pub fn classify(&self, raw_import: &str, resolved: Option<String>) -> Resolution {
        match resolved {
            Some(path) => {
                let edge_type = if self.is_dynamic(raw_import) {
                    EdgeType::Dynamic
                } else {
                    EdgeType::Direct
                };
                Resolution::internal(path, edge_type)
            }
            None if self.is_external(raw_import) => Resolution::external(),
            None => Resolution::unresolved(),
        }
    }

    fn is_dynamic(&self, raw_import: &str) -> bool {
        let raw_import = raw_import.trim();
        self.dynamic_patterns.iter().any(|p| p.matches(raw_import))
    }

    fn is_external(&self, raw_import: &str) -> bool {
        top_level_name(raw_import).is_some_and(|name| self.external_modules.contains(name))
    }
}

/// Resolution of every import in a repository, in file then import order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    #[serde(skip)]
    index: HashMap<(String, String), usize>,
}

impl SymbolTable {
    /// Build using the convention-driven [`PathResolver`]
    pub fn build(repository: &Repository, config: &ResolverConfig) -> Result<Self> {
        let resolver = PathResolver::new(repository.files.iter().map(|f| f.path.as_str()), config);
        Self::build_with_resolver(repository, config, &resolver)
    }

    /// Build using a caller-supplied resolution strategy
    pub fn build_with_resolver(
        repository: &Repository,
        config: &ResolverConfig,
        resolver: &dyn ImportResolver,
    ) -> Result<Self> {
        let classifier = ImportClassifier::new(config)?;
        let paths: HashSet<&str> = repository.files.iter().map(|f| f.path.as_str()).collect();
        let mut table = SymbolTable::default();

        for file in &repository.files {
            let mut internal = 0usize;
            for raw_import in &file.imports {
                let key = (file.path.clone(), raw_import.clone());
                if table.index.contains_key(&key) {
                    continue;
                }

                // Only files of this repository count as resolved
                let resolved = resolver.resolve(raw_import, &file.path).filter(|path| {
                    let known = paths.contains(path.as_str());
                    if !known {
                        tracing::debug!(
                            file = %file.path,
                            import = %raw_import,
                            resolved = %path,
                            "resolver returned a path outside the repository"
                        );
                    }
                    known
                });
                let resolution = classifier.classify(raw_import, resolved);
                if resolution.resolved_path.is_some() {
                    internal += 1;
                }

                table.index.insert(key, table.entries.len());
                table.entries.push(SymbolEntry {
                    source: file.path.clone(),
                    raw_import: raw_import.clone(),
                    resolution,
                });
            }
            tracing::debug!(
                file = %file.path,
                imports = file.imports.len(),
                internal,
                "resolved imports"
            );
        }

        Ok(table)
    }

    /// Look up the resolution of one import of one file
    pub fn get(&self, source: &str, raw_import: &str) -> Option<&Resolution> {
        self.index
            .get(&(source.to_string(), raw_import.to_string()))
            .map(|&i| &self.entries[i].resolution)
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    /// Entries whose edge type matches
    pub fn entries_of_type(&self, edge_type: EdgeType) -> impl Iterator<Item = &SymbolEntry> {
        self.entries
            .iter()
            .filter(move |e| e.resolution.edge_type == edge_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
