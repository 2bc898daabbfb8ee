//! Configuration file and environment handling

use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{parser, ConfigSource};
use crate::error::{DepscopeError, Result};
use crate::models::config::PartialSettings;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".depscope.toml";

/// Prefix of the environment variables read by [`EnvConfig`]
pub const ENV_PREFIX: &str = "DEPSCOPE";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// Create a new file configuration source with the default path
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 10,
        }
    }

    /// Create a new file configuration source with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 10,
        }
    }

    /// Set the priority for this configuration source
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Get the path of this configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a default configuration file at this location
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(DepscopeError::ConfigNotFound {
                path: self.path.clone(),
            });
        }

        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Variables understood by [`EnvConfig`], without their prefix
const ENV_KEYS: &[&str] = &[
    "CONVENTION",
    "EXTENSIONS",
    "SOURCE_ROOTS",
    "EXTERNAL_MODULES",
    "DYNAMIC_PATTERNS",
    "EXCLUDE",
    "MAX_NODES",
    "OUTPUT_FORMAT",
    "OUTPUT_FILE",
    "PARALLEL",
    "THREADS",
    "NO_COLOR",
];

/// Environment variable configuration source
///
/// List values are comma-separated.
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

impl EnvConfig {
    /// Create a new environment variable configuration source
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 20,
        }
    }

    /// Set the priority for this configuration source
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    fn var_name(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key)
    }

    /// Build settings from an arbitrary variable lookup
    pub fn load_with<F>(&self, lookup: F) -> Result<PartialSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(&self.var_name(key));
        let mut settings = PartialSettings::default();

        if let Some(value) = get("CONVENTION") {
            settings.convention = Some(self.parse_value("CONVENTION", &value)?);
        }
        if let Some(value) = get("EXTENSIONS") {
            settings.extensions = Some(split_list(&value));
        }
        if let Some(value) = get("SOURCE_ROOTS") {
            // An empty entry means the repository root, so keep empties here
            settings.source_roots = Some(value.split(',').map(|s| s.trim().to_string()).collect());
        }
        if let Some(value) = get("EXTERNAL_MODULES") {
            settings.external_modules = Some(split_list(&value));
        }
        if let Some(value) = get("DYNAMIC_PATTERNS") {
            settings.dynamic_patterns = Some(split_list(&value));
        }
        if let Some(value) = get("EXCLUDE") {
            settings.exclude_patterns = Some(split_list(&value));
        }
        if let Some(value) = get("MAX_NODES") {
            settings.max_nodes = Some(self.parse_value("MAX_NODES", &value)?);
        }
        if let Some(value) = get("OUTPUT_FORMAT") {
            settings.output_format = Some(self.parse_value("OUTPUT_FORMAT", &value)?);
        }
        if let Some(value) = get("OUTPUT_FILE") {
            settings.output_file = Some(PathBuf::from(value));
        }
        if let Some(value) = get("PARALLEL") {
            settings.parallel = Some(parse_bool(&value).ok_or_else(|| self.invalid("PARALLEL", &value))?);
        }
        if let Some(value) = get("THREADS") {
            settings.threads = Some(self.parse_value("THREADS", &value)?);
        }
        if get("NO_COLOR").is_some() {
            settings.use_colors = Some(false);
        }

        Ok(settings)
    }

    fn parse_value<T: FromStr>(&self, key: &str, value: &str) -> Result<T> {
        value.trim().parse().map_err(|_| self.invalid(key, value))
    }

    fn invalid(&self, key: &str, value: &str) -> DepscopeError {
        DepscopeError::config_error(format!(
            "invalid value '{}' for {}",
            value,
            self.var_name(key)
        ))
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        self.load_with(|name| std::env::var(name).ok())
    }

    fn is_available(&self) -> bool {
        ENV_KEYS
            .iter()
            .any(|key| std::env::var(self.var_name(key)).is_ok())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
