//! Configuration management
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `DEPSCOPE_*` environment variables, then command-line arguments.

pub mod cli;
pub mod file;
pub mod parser;
pub mod settings;

use crate::error::Result;
use crate::models::config::{PartialSettings, Settings};

pub use cli::{CliArgs, CliConfig};
pub use file::{EnvConfig, FileConfig, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use parser::{create_default_config, find_default_config, parse_config_content, parse_config_file};
pub use settings::SettingsValidator;

/// Trait for configuration sources
pub trait ConfigSource {
    /// Load configuration from this source
    fn load(&self) -> Result<PartialSettings>;

    /// Check if this configuration source is available
    fn is_available(&self) -> bool;

    /// Get the name of this configuration source for logging
    fn name(&self) -> &str;

    /// Get the priority of this source (higher numbers take precedence)
    fn priority(&self) -> u8 {
        10
    }
}

/// Configuration builder for merging multiple sources
pub struct ConfigBuilder {
    partial: PartialSettings,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self {
            partial: PartialSettings::default(),
        }
    }

    /// Merge settings from a partial configuration
    pub fn merge(mut self, partial: PartialSettings) -> Self {
        self.partial.merge_from(partial);
        self
    }

    /// Load and merge settings from a configuration source
    pub fn load_from<S: ConfigSource>(self, source: &S) -> Result<Self> {
        if !source.is_available() {
            return Ok(self);
        }
        let partial = source.load()?;
        tracing::debug!(source = source.name(), "loaded configuration");
        Ok(self.merge(partial))
    }

    /// Try to load from a source, ignoring it if unavailable or broken
    pub fn try_load_from<S: ConfigSource>(self, source: &S) -> Self {
        if !source.is_available() {
            return self;
        }
        match source.load() {
            Ok(partial) => {
                tracing::debug!(source = source.name(), "loaded configuration");
                self.merge(partial)
            }
            Err(err) => {
                tracing::warn!(source = source.name(), error = %err, "ignoring configuration source");
                self
            }
        }
    }

    /// Add configuration from a file, which must exist
    pub fn add_config_file(self, path: &std::path::Path) -> Result<Self> {
        let file_config = FileConfig::with_path(path);
        if !file_config.is_available() {
            return Err(crate::error::DepscopeError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        self.load_from(&file_config)
    }

    /// Add configuration from the first default location that has a file
    pub fn add_default_config_file(self) -> Result<Self> {
        match parser::find_default_config()? {
            Some(partial) => Ok(self.merge(partial)),
            None => Ok(self),
        }
    }

    /// Build the final settings with validation
    pub fn build(self) -> Result<Settings> {
        let settings = self.partial.to_settings();
        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from every source with the standard precedence
pub fn load_config(cli_args: CliArgs) -> Result<Settings> {
    load_config_with_env_prefix(cli_args, ENV_PREFIX)
}

/// Load configuration with a custom environment variable prefix
pub fn load_config_with_env_prefix(cli_args: CliArgs, env_prefix: &str) -> Result<Settings> {
    let mut builder = ConfigBuilder::new();

    builder = match &cli_args.config {
        Some(path) => builder.add_config_file(path)?,
        None => builder.add_default_config_file()?,
    };

    builder = builder.load_from(&EnvConfig::new(env_prefix))?;
    builder = builder.load_from(&CliConfig::new(cli_args))?;

    builder.build()
}
