//! Source-code structure records consumed by the graph builder
//!
//! These are produced by an external parser; depscope only validates them and
//! reads `path` and `imports` when assembling the dependency graph.

use crate::error::{DepscopeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default repository name when the producer does not supply one
pub const DEFAULT_REPOSITORY_NAME: &str = "Unknown Repo";

fn default_complexity() -> u32 {
    1
}

fn default_repository_name() -> String {
    DEFAULT_REPOSITORY_NAME.to_string()
}

/// A function or method declared in a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionNode {
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
    #[serde(default)]
    pub docstring: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_complexity")]
    pub complexity: u32,
}

impl FunctionNode {
    /// Create a function record with no docstring, no args and complexity 1
    pub fn new(name: impl Into<String>, start_line: u32, end_line: u32) -> Result<Self> {
        let node = Self {
            name: name.into(),
            start_line,
            end_line,
            docstring: None,
            args: Vec::new(),
            complexity: default_complexity(),
        };
        node.validate()?;
        Ok(node)
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = Some(docstring.into());
        self
    }

    /// Set the cyclomatic complexity; must be at least 1
    pub fn with_complexity(mut self, complexity: u32) -> Result<Self> {
        self.complexity = complexity;
        self.validate()?;
        Ok(self)
    }

    /// Check name, line range and complexity
    pub fn validate(&self) -> Result<()> {
        validate_span("function", &self.name, self.start_line, self.end_line)?;
        if self.complexity < 1 {
            return Err(DepscopeError::validation(
                format!(
                    "function '{}' has complexity {}, must be at least 1",
                    self.name, self.complexity
                ),
                Vec::new(),
            ));
        }
        Ok(())
    }
}

/// A class declared in a source file, owning its methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassNode {
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
    #[serde(default)]
    pub docstring: Option<String>,
    #[serde(default)]
    pub methods: Vec<FunctionNode>,
    #[serde(default)]
    pub bases: Vec<String>,
}

impl ClassNode {
    pub fn new(name: impl Into<String>, start_line: u32, end_line: u32) -> Result<Self> {
        let node = Self {
            name: name.into(),
            start_line,
            end_line,
            docstring: None,
            methods: Vec::new(),
            bases: Vec::new(),
        };
        node.validate()?;
        Ok(node)
    }

    pub fn with_methods(mut self, methods: Vec<FunctionNode>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_bases(mut self, bases: Vec<String>) -> Self {
        self.bases = bases;
        self
    }

    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = Some(docstring.into());
        self
    }

    /// Check the class span and every method
    pub fn validate(&self) -> Result<()> {
        validate_span("class", &self.name, self.start_line, self.end_line)?;
        for method in &self.methods {
            method.validate()?;
        }
        Ok(())
    }
}

fn validate_span(what: &str, name: &str, start_line: u32, end_line: u32) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DepscopeError::validation(
            format!("{} name must not be empty", what),
            Vec::new(),
        ));
    }
    if start_line == 0 || end_line == 0 {
        return Err(DepscopeError::validation(
            format!("{} '{}' has a zero line number; lines start at 1", what, name),
            Vec::new(),
        ));
    }
    if start_line > end_line {
        return Err(DepscopeError::validation(
            format!(
                "{} '{}' starts at line {} after it ends at line {}",
                what, name, start_line, end_line
            ),
            Vec::new(),
        ));
    }
    Ok(())
}

/// A single source file and what was extracted from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub path: String,
    pub content: String,
    #[serde(default)]
    pub classes: Vec<ClassNode>,
    #[serde(default)]
    pub functions: Vec<FunctionNode>,
    /// Raw import strings, in source order
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub loc: usize,
}

impl FileNode {
    /// Create a file record; `loc` is taken from the content's line count
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        let node = Self {
            path: path.into(),
            loc: content.lines().count(),
            content,
            classes: Vec::new(),
            functions: Vec::new(),
            imports: Vec::new(),
            summary: None,
        };
        node.validate()?;
        Ok(node)
    }

    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_classes(mut self, classes: Vec<ClassNode>) -> Self {
        self.classes = classes;
        self
    }

    pub fn with_functions(mut self, functions: Vec<FunctionNode>) -> Self {
        self.functions = functions;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Check the path and every declared class and function
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(DepscopeError::validation(
                "file path must not be empty",
                Vec::new(),
            ));
        }
        let in_file = |err: DepscopeError| match err {
            DepscopeError::Validation { message, .. } => DepscopeError::validation(
                format!("{} (in {})", message, self.path),
                vec![self.path.clone()],
            ),
            other => other,
        };
        for class in &self.classes {
            class.validate().map_err(in_file)?;
        }
        for function in &self.functions {
            function.validate().map_err(in_file)?;
        }
        Ok(())
    }
}

/// An analysed repository: an ordered list of files unique by path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub root_path: String,
    #[serde(default)]
    pub files: Vec<FileNode>,
    #[serde(default = "default_repository_name")]
    pub name: String,
}

impl Repository {
    /// Create a repository, rejecting duplicate file paths
    pub fn new(root_path: impl Into<String>, files: Vec<FileNode>) -> Result<Self> {
        let repository = Self {
            root_path: root_path.into(),
            files,
            name: default_repository_name(),
        };
        repository.validate()?;
        Ok(repository)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Look up a file by its exact path
    pub fn file(&self, path: &str) -> Option<&FileNode> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Check every file and that no two files share a path
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.files.len());
        for file in &self.files {
            if !seen.insert(file.path.as_str()) {
                return Err(DepscopeError::validation(
                    format!("duplicate file path '{}'", file.path),
                    vec![file.path.clone()],
                ));
            }
            file.validate()?;
        }
        Ok(())
    }
}
