//! Error types and definitions for depscope
//!
//! Three kinds come straight out of the analysis core: validation failures on
//! the input repository, structural violations in a dependency graph, and
//! queries against nodes that do not exist. The remaining variants cover the
//! ambient concerns of the command-line tool (configuration, I/O, output).

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for depscope operations
#[derive(Debug, Error)]
pub enum DepscopeError {
    /// Malformed or ambiguous input data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        paths: Vec<String>,
    },

    /// A dependency graph violates its structural invariants
    #[error("Malformed graph: edge {source_path} -> {target}: {message}")]
    MalformedGraph {
        source_path: String,
        target: String,
        message: String,
    },

    /// A query named a node that is not part of the graph
    #[error("Unknown node: {path}")]
    UnknownNode { path: String },

    /// The repository is larger than the configured node ceiling
    #[error("Node limit exceeded: {count} files, limit is {limit}")]
    NodeLimitExceeded { count: usize, limit: usize },

    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// Errors reading an input file
    #[error("Error reading {path}: {message}")]
    FileRead { path: PathBuf, message: String },

    /// JSON parsing errors with file context
    #[error("JSON parsing error in {file}: {source}")]
    JsonParse {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
    },

    /// CSV handling errors
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// Parallel execution error
    #[error("Parallel execution error: {message}")]
    ParallelExecution { message: String },
}

impl DepscopeError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DepscopeError::Config { .. } => ErrorSeverity::Critical,
            DepscopeError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            DepscopeError::ConfigRead { .. } => ErrorSeverity::Critical,
            DepscopeError::ConfigParse { .. } => ErrorSeverity::Critical,
            DepscopeError::StdoutWrite { .. } => ErrorSeverity::Critical,

            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Stable name of the error kind, as shown to users
    pub fn kind(&self) -> &'static str {
        match self {
            DepscopeError::Validation { .. } => "ValidationError",
            DepscopeError::MalformedGraph { .. } => "MalformedGraphError",
            DepscopeError::UnknownNode { .. } => "UnknownNodeError",
            DepscopeError::NodeLimitExceeded { .. } => "NodeLimitExceeded",
            DepscopeError::Io { .. } | DepscopeError::FileRead { .. } => "IoError",
            DepscopeError::JsonParse { .. } | DepscopeError::JsonSerialize { .. } => "JsonError",
            DepscopeError::Config { .. }
            | DepscopeError::ConfigNotFound { .. }
            | DepscopeError::ConfigRead { .. }
            | DepscopeError::ConfigParse { .. } => "ConfigError",
            DepscopeError::GlobPattern { .. } => "GlobPatternError",
            DepscopeError::Csv { .. } => "CsvError",
            DepscopeError::OutputWrite { .. } | DepscopeError::StdoutWrite { .. } => "OutputError",
            DepscopeError::ParallelExecution { .. } => "ParallelExecutionError",
        }
    }

    /// File paths implicated by this error, if any
    pub fn implicated_paths(&self) -> Vec<String> {
        match self {
            DepscopeError::Validation { paths, .. } => paths.clone(),
            DepscopeError::MalformedGraph {
                source_path, target, ..
            } => vec![source_path.clone(), target.clone()],
            DepscopeError::UnknownNode { path } => vec![path.clone()],
            DepscopeError::JsonParse { file, .. } => vec![file.display().to_string()],
            DepscopeError::ConfigNotFound { path }
            | DepscopeError::ConfigRead { path, .. }
            | DepscopeError::ConfigParse { path, .. }
            | DepscopeError::OutputWrite { path, .. }
            | DepscopeError::FileRead { path, .. } => vec![path.display().to_string()],
            _ => Vec::new(),
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            DepscopeError::Validation { message, .. } => {
                format!("The repository description is invalid: {}.", message)
            }
            DepscopeError::MalformedGraph {
                source_path,
                target,
                message,
            } => {
                format!(
                    "The dependency graph is malformed: edge '{}' -> '{}' {}.",
                    source_path, target, message
                )
            }
            DepscopeError::UnknownNode { path } => {
                format!("'{}' is not a file in this repository.", path)
            }
            DepscopeError::NodeLimitExceeded { count, limit } => {
                format!(
                    "The repository has {} files but analysis is limited to {}.",
                    count, limit
                )
            }
            DepscopeError::JsonParse { file, source } => {
                format!(
                    "Invalid JSON in '{}': {}. Please check the file format.",
                    file.display(),
                    source
                )
            }
            DepscopeError::Io { source } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            DepscopeError::ConfigNotFound { path } => {
                format!(
                    "Configuration file not found at '{}'. Create a config file or use command line options.",
                    path.display()
                )
            }
            _ => self.to_string(),
        }
    }

    /// Suggest a fix for the user, where one is obvious
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            DepscopeError::Validation { .. } => {
                Some("Ensure every file path is unique and line ranges are well-formed")
            }
            DepscopeError::UnknownNode { .. } => {
                Some("Use a path exactly as it appears in the repository's file list")
            }
            DepscopeError::NodeLimitExceeded { .. } => {
                Some("Raise the limit with --max-nodes or exclude files with exclude_patterns")
            }
            DepscopeError::ConfigNotFound { .. } => Some(
                "Create a .depscope.toml file with `depscope init` or specify a config file with --config",
            ),
            DepscopeError::OutputWrite { .. } => {
                Some("Create the output directory first or specify a different path")
            }
            _ => None,
        }
    }

    /// Create a validation error naming the offending paths
    pub fn validation(message: impl Into<String>, paths: Vec<String>) -> Self {
        DepscopeError::Validation {
            message: message.into(),
            paths,
        }
    }

    /// Create a malformed graph error for the given edge
    pub fn malformed_graph(
        source_path: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        DepscopeError::MalformedGraph {
            source_path: source_path.into(),
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create an unknown node error
    pub fn unknown_node(path: impl Into<String>) -> Self {
        DepscopeError::UnknownNode { path: path.into() }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        DepscopeError::Io { source }
    }

    /// Create a JSON parse error with file context
    pub fn json_parse_error(file: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        DepscopeError::JsonParse {
            file: file.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        DepscopeError::Config {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for DepscopeError {
    fn from(err: std::io::Error) -> Self {
        DepscopeError::io_error(err)
    }
}

impl From<serde_json::Error> for DepscopeError {
    fn from(err: serde_json::Error) -> Self {
        DepscopeError::JsonSerialize { source: err }
    }
}

impl From<toml::de::Error> for DepscopeError {
    fn from(err: toml::de::Error) -> Self {
        DepscopeError::ConfigParse {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<csv::Error> for DepscopeError {
    fn from(err: csv::Error) -> Self {
        DepscopeError::Csv { source: err }
    }
}

impl From<glob::PatternError> for DepscopeError {
    fn from(err: glob::PatternError) -> Self {
        DepscopeError::GlobPattern { source: err }
    }
}

/// Result type alias for depscope operations
pub type Result<T> = std::result::Result<T, DepscopeError>;
