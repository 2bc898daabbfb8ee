//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// How raw import strings are matched to repository files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionConvention {
    /// Exact path, then relative to the importing file's directory
    #[default]
    RelativePath,
    /// Exact path, then relative to each source root, then relative to the importer
    PackageRoot,
    /// Alias rewriting first, then the package-root rules
    CustomResolver,
}

impl std::str::FromStr for ResolutionConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "relative-path" | "relative" => Ok(ResolutionConvention::RelativePath),
            "package-root" | "package" => Ok(ResolutionConvention::PackageRoot),
            "custom-resolver" | "custom" => Ok(ResolutionConvention::CustomResolver),
            _ => Err(format!("Invalid resolution convention: {}", s)),
        }
    }
}

impl std::fmt::Display for ResolutionConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionConvention::RelativePath => write!(f, "relative-path"),
            ResolutionConvention::PackageRoot => write!(f, "package-root"),
            ResolutionConvention::CustomResolver => write!(f, "custom-resolver"),
        }
    }
}

/// Import resolution settings consumed by the symbol table builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub convention: ResolutionConvention,
    /// Extensions tried when an import names a file without one
    pub extensions: Vec<String>,
    /// File stems that make a directory importable (`pkg/__init__.py`, `lib/index.js`)
    pub index_files: Vec<String>,
    /// Directories searched by the package-root convention; "" is the repository root
    pub source_roots: Vec<String>,
    /// Import prefix rewrites used by the custom-resolver convention
    pub aliases: BTreeMap<String, String>,
    /// Top-level module names that are third-party
    pub external_modules: Vec<String>,
    /// Glob patterns on raw import text marking runtime imports
    pub dynamic_patterns: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            convention: ResolutionConvention::RelativePath,
            extensions: [".py", ".rs", ".js", ".jsx", ".ts", ".tsx", ".go"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            index_files: ["__init__", "index", "mod"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            source_roots: vec![String::new(), "src".to_string()],
            aliases: BTreeMap::new(),
            external_modules: Vec::new(),
            dynamic_patterns: Vec::new(),
        }
    }
}

impl ResolverConfig {
    /// Default resolution rules under the given convention
    pub fn with_convention(convention: ResolutionConvention) -> Self {
        Self {
            convention,
            ..Self::default()
        }
    }
}

/// Main configuration settings for depscope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Import resolution rules
    pub resolver: ResolverConfig,

    /// Glob patterns for repository files left out of the graph
    pub exclude_patterns: Vec<String>,

    /// Refuse repositories with more files than this
    pub max_nodes: Option<usize>,

    /// Output format (text, json, csv, dot)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Whether to compute per-file impact for the whole repository in parallel
    pub parallel: bool,

    /// Worker threads for parallel analysis; defaults to the CPU count
    pub threads: Option<usize>,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show detailed progress and debug information
    pub verbose: bool,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to show progress bars
    pub show_progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            exclude_patterns: Vec::new(),
            max_nodes: None,
            output_format: OutputFormat::Text,
            output_file: None,
            parallel: true,
            threads: None,
            quiet: false,
            verbose: false,
            use_colors: true,
            show_progress: true,
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
    /// Graphviz DOT output
    Dot,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "dot" => Ok(OutputFormat::Dot),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Dot => write!(f, "dot"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSettings {
    pub convention: Option<ResolutionConvention>,
    pub extensions: Option<Vec<String>>,
    pub index_files: Option<Vec<String>>,
    pub source_roots: Option<Vec<String>>,
    pub aliases: Option<BTreeMap<String, String>>,
    pub external_modules: Option<Vec<String>>,
    pub dynamic_patterns: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub max_nodes: Option<usize>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub parallel: Option<bool>,
    pub threads: Option<usize>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        if other.convention.is_some() {
            self.convention = other.convention;
        }
        if other.extensions.is_some() {
            self.extensions = other.extensions;
        }
        if other.index_files.is_some() {
            self.index_files = other.index_files;
        }
        if other.source_roots.is_some() {
            self.source_roots = other.source_roots;
        }
        if other.aliases.is_some() {
            self.aliases = other.aliases;
        }
        if other.external_modules.is_some() {
            self.external_modules = other.external_modules;
        }
        if other.dynamic_patterns.is_some() {
            self.dynamic_patterns = other.dynamic_patterns;
        }
        if other.exclude_patterns.is_some() {
            self.exclude_patterns = other.exclude_patterns;
        }
        if other.max_nodes.is_some() {
            self.max_nodes = other.max_nodes;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
        if other.parallel.is_some() {
            self.parallel = other.parallel;
        }
        if other.threads.is_some() {
            self.threads = other.threads;
        }
        if other.quiet.is_some() {
            self.quiet = other.quiet;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.use_colors.is_some() {
            self.use_colors = other.use_colors;
        }
        if other.show_progress.is_some() {
            self.show_progress = other.show_progress;
        }
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(convention) = self.convention {
            settings.resolver.convention = convention;
        }
        if let Some(extensions) = &self.extensions {
            settings.resolver.extensions = extensions.clone();
        }
        if let Some(index_files) = &self.index_files {
            settings.resolver.index_files = index_files.clone();
        }
        if let Some(source_roots) = &self.source_roots {
            settings.resolver.source_roots = source_roots.clone();
        }
        if let Some(aliases) = &self.aliases {
            settings.resolver.aliases = aliases.clone();
        }
        if let Some(external_modules) = &self.external_modules {
            settings.resolver.external_modules = external_modules.clone();
        }
        if let Some(dynamic_patterns) = &self.dynamic_patterns {
            settings.resolver.dynamic_patterns = dynamic_patterns.clone();
        }
        if let Some(exclude_patterns) = &self.exclude_patterns {
            settings.exclude_patterns = exclude_patterns.clone();
        }
        if let Some(max_nodes) = self.max_nodes {
            settings.max_nodes = Some(max_nodes);
        }
        if let Some(output_format) = self.output_format {
            settings.output_format = output_format;
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(parallel) = self.parallel {
            settings.parallel = parallel;
        }
        if let Some(threads) = self.threads {
            settings.threads = Some(threads);
        }
        if let Some(quiet) = self.quiet {
            settings.quiet = quiet;
        }
        if let Some(verbose) = self.verbose {
            settings.verbose = verbose;
        }
        if let Some(use_colors) = self.use_colors {
            settings.use_colors = use_colors;
        }
        if let Some(show_progress) = self.show_progress {
            settings.show_progress = show_progress;
        }

        settings
    }
}
