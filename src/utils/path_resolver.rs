//! Import path resolution utilities
//!
//! Matches raw import strings against the file paths of a repository. Nothing
//! here touches the filesystem: the repository's path list is the universe of
//! resolvable targets.

use crate::models::config::{ResolutionConvention, ResolverConfig};
use std::collections::HashMap;

/// Strategy mapping a raw import to a repository file path
pub trait ImportResolver: Send + Sync {
    /// Resolve `specifier`, imported from the file at `from`, to a repository path
    fn resolve(&self, specifier: &str, from: &str) -> Option<String>;
}

/// Convention-driven resolver over a fixed set of repository paths
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Normalized path -> path as written in the repository
    files: HashMap<String, String>,
    config: ResolverConfig,
}

impl PathResolver {
    /// Create a resolver over the given repository paths
    pub fn new<'a, I>(paths: I, config: &ResolverConfig) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut files = HashMap::new();
        for path in paths {
            // First occurrence wins; duplicate paths are rejected earlier by validation
            files
                .entry(normalize_path(path))
                .or_insert_with(|| path.to_string());
        }

        Self {
            files,
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve following the configured convention
    pub fn resolve_specifier(&self, specifier: &str, from: &str) -> Option<String> {
        let specifier = specifier.trim();
        if specifier.is_empty() {
            return None;
        }

        match self.config.convention {
            ResolutionConvention::RelativePath => self.resolve_relative_convention(specifier, from),
            ResolutionConvention::PackageRoot => self.resolve_package_convention(specifier, from),
            ResolutionConvention::CustomResolver => {
                if let Some(rewritten) = self.rewrite_alias(specifier) {
                    if let Some(found) = self.resolve_package_convention(&rewritten, from) {
                        return Some(found);
                    }
                }
                self.resolve_package_convention(specifier, from)
            }
        }
    }

    fn resolve_relative_convention(&self, specifier: &str, from: &str) -> Option<String> {
        if is_relative_specifier(specifier) {
            return self.resolve_from_importer(specifier, from);
        }
        self.resolve_exact(specifier)
            .or_else(|| self.resolve_from_importer(specifier, from))
    }

    fn resolve_package_convention(&self, specifier: &str, from: &str) -> Option<String> {
        if is_relative_specifier(specifier) {
            return self.resolve_from_importer(specifier, from);
        }
        self.resolve_exact(specifier)
            .or_else(|| self.resolve_from_roots(specifier))
            .or_else(|| self.resolve_from_importer(specifier, from))
    }

    /// Match the specifier as a path from the repository root
    fn resolve_exact(&self, specifier: &str) -> Option<String> {
        module_candidates(specifier)
            .into_iter()
            .find_map(|candidate| self.lookup(&candidate))
    }

    /// Match the specifier under each configured source root
    fn resolve_from_roots(&self, specifier: &str) -> Option<String> {
        let candidates = module_candidates(specifier);
        self.config.source_roots.iter().find_map(|root| {
            candidates
                .iter()
                .find_map(|candidate| self.lookup(&join_path(root, candidate)))
        })
    }

    /// Match the specifier against the importing file's directory
    fn resolve_from_importer(&self, specifier: &str, from: &str) -> Option<String> {
        let base_dir = parent_dir(&normalize_path(from)).to_string();

        if specifier.contains('/') {
            return self.lookup(&join_path(&base_dir, specifier));
        }

        let levels = specifier.chars().take_while(|c| *c == '.').count();
        let body = &specifier[levels..];
        if levels == 0 {
            return module_candidates(specifier)
                .into_iter()
                .find_map(|candidate| self.lookup(&join_path(&base_dir, &candidate)));
        }

        // One leading dot is the importer's own directory, each further dot one level up
        let mut dir = base_dir;
        for _ in 1..levels {
            dir = parent_dir(&dir).to_string();
        }
        self.lookup(&join_path(&dir, &body.replace('.', "/")))
    }

    /// Rewrite the longest matching alias prefix
    fn rewrite_alias(&self, specifier: &str) -> Option<String> {
        self.config
            .aliases
            .iter()
            .filter(|(prefix, _)| specifier.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, replacement)| format!("{}{}", replacement, &specifier[prefix.len()..]))
    }

    /// Find a file for a base path, trying extensions and index files
    fn lookup(&self, base: &str) -> Option<String> {
        let base = normalize_path(base);
        if base.is_empty() || base.starts_with("..") {
            return self.lookup_index(&base);
        }

        if let Some(found) = self.files.get(&base) {
            return Some(found.clone());
        }
        for ext in &self.config.extensions {
            if let Some(found) = self.files.get(&format!("{}{}", base, ext)) {
                return Some(found.clone());
            }
        }
        self.lookup_index(&base)
    }

    fn lookup_index(&self, dir: &str) -> Option<String> {
        if dir.starts_with("..") {
            return None;
        }
        for index in &self.config.index_files {
            let stem = join_path(dir, index);
            for ext in &self.config.extensions {
                if let Some(found) = self.files.get(&format!("{}{}", stem, ext)) {
                    return Some(found.clone());
                }
            }
        }
        None
    }
}

impl ImportResolver for PathResolver {
    fn resolve(&self, specifier: &str, from: &str) -> Option<String> {
        self.resolve_specifier(specifier, from)
    }
}

/// Normalize separators and collapse `.` and `..` segments
///
/// `..` segments that climb above the start are kept, so such paths never
/// match a repository file.
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let mut parts: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(last) if *last != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// Directory part of a normalized path ("" for top-level files)
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

fn join_path(dir: &str, rest: &str) -> String {
    if dir.is_empty() {
        normalize_path(rest)
    } else {
        normalize_path(&format!("{}/{}", dir, rest))
    }
}

/// Whether an import is written relative to the importing file
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with('.')
}

/// Path forms of a non-relative specifier: as written, then dotted-module form
fn module_candidates(specifier: &str) -> Vec<String> {
    let mut candidates = vec![normalize_path(specifier)];
    if !specifier.contains('/') {
        let dotted = normalize_path(&specifier.replace("::", "/").replace('.', "/"));
        if !candidates.contains(&dotted) {
            candidates.push(dotted);
        }
    }
    candidates
}

/// Top-level package name of a non-relative import
///
/// `@scope/name/sub` keeps the scope; otherwise the first segment on `.`,
/// `/` or `::` is returned.
pub fn top_level_name(specifier: &str) -> Option<&str> {
    let specifier = specifier.trim();
    if specifier.is_empty() || is_relative_specifier(specifier) {
        return None;
    }

    if specifier.starts_with('@') {
        let mut slashes = specifier.match_indices('/').map(|(i, _)| i);
        return match (slashes.next(), slashes.next()) {
            (Some(_), Some(second)) => Some(&specifier[..second]),
            _ => Some(specifier),
        };
    }

    let end = specifier
        .find(|c: char| c == '.' || c == '/' || c == ':')
        .unwrap_or(specifier.len());
    Some(&specifier[..end])
}
