//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use super::file::DEFAULT_CONFIG_FILE;
use crate::error::{DepscopeError, Result};
use crate::models::config::PartialSettings;

/// Template written by `depscope init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("default_config.toml");

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DepscopeError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| DepscopeError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|e| DepscopeError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

/// Validate partial settings for obvious errors
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialSettings, path: P) -> Result<()> {
    let path = path.as_ref();

    let check_patterns = |field: &str, patterns: &Option<Vec<String>>| -> Result<()> {
        for pattern in patterns.iter().flatten() {
            if pattern.is_empty() {
                return Err(DepscopeError::config_error(format!(
                    "Empty pattern in {} in config file: {}",
                    field,
                    path.display()
                )));
            }
            glob::Pattern::new(pattern).map_err(|e| {
                DepscopeError::config_error(format!(
                    "Invalid pattern '{}' in {} in config file: {}: {}",
                    pattern,
                    field,
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    };
    check_patterns("exclude_patterns", &settings.exclude_patterns)?;
    check_patterns("dynamic_patterns", &settings.dynamic_patterns)?;

    if let Some(extensions) = &settings.extensions {
        if let Some(bad) = extensions.iter().find(|e| !e.starts_with('.')) {
            return Err(DepscopeError::config_error(format!(
                "Extension '{}' in config file {} must start with '.'",
                bad,
                path.display()
            )));
        }
    }

    if settings.max_nodes == Some(0) {
        return Err(DepscopeError::config_error(format!(
            "Invalid max_nodes 0 in config file: {}. Must be at least 1.",
            path.display()
        )));
    }

    if settings.threads == Some(0) {
        return Err(DepscopeError::config_error(format!(
            "Invalid threads 0 in config file: {}. Must be at least 1.",
            path.display()
        )));
    }

    if let Some(output_file) = &settings.output_file {
        if output_file.as_os_str().is_empty() {
            return Err(DepscopeError::config_error(format!(
                "Invalid empty output_file in config file: {}",
                path.display()
            )));
        }
    }

    Ok(())
}

/// Candidate configuration files, most specific first
pub fn default_config_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
    if let Some(home_dir) = dirs::home_dir() {
        locations.push(home_dir.join(DEFAULT_CONFIG_FILE));
    }
    if let Some(config_dir) = dirs::config_dir() {
        locations.push(config_dir.join("depscope").join("config.toml"));
    }
    locations
}

/// Find and load configuration from default locations
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    for location in default_config_locations() {
        if location.is_file() {
            tracing::debug!(path = %location.display(), "using configuration file");
            return Ok(Some(parse_config_file(location)?));
        }
    }
    Ok(None)
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(DepscopeError::io_error)?;
        }
    }

    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(|e| DepscopeError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
