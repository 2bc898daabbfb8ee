//! Repository document loading
//!
//! The graph builder consumes repositories extracted by an external scanner.
//! They arrive as JSON documents shaped like [`Repository`].

use crate::error::{DepscopeError, Result, ResultExt};
use crate::models::code::Repository;
use std::path::Path;

/// Parser for repository JSON documents
pub struct RepositoryParser;

impl RepositoryParser {
    /// Parse repository JSON content and validate it
    pub fn parse(content: &str) -> Result<Repository> {
        Self::parse_named(content, Path::new("<input>"))
    }

    /// Read and parse a repository JSON file
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Repository> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).with_file_context(path)?;
        let repository = Self::parse_named(&content, path)?;

        tracing::info!(
            path = %path.display(),
            repository = %repository.name,
            files = repository.files.len(),
            "loaded repository"
        );
        Ok(repository)
    }

    fn parse_named(content: &str, origin: &Path) -> Result<Repository> {
        let repository: Repository = serde_json::from_str(content)
            .map_err(|e| DepscopeError::json_parse_error(origin, e))?;
        repository.validate()?;
        Ok(repository)
    }
}
