//! Settings validation

use crate::error::{DepscopeError, Result, ResultExt};
use crate::models::config::Settings;
use std::path::Path;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return errors if invalid
    pub fn validate(settings: &Settings) -> Result<()> {
        for pattern in &settings.exclude_patterns {
            glob::Pattern::new(pattern)
                .with_context(|| format!("Invalid exclude pattern: {}", pattern))?;
        }
        for pattern in &settings.resolver.dynamic_patterns {
            glob::Pattern::new(pattern)
                .with_context(|| format!("Invalid dynamic import pattern: {}", pattern))?;
        }

        if settings.resolver.extensions.is_empty() {
            return Err(DepscopeError::config_error(
                "At least one file extension must be configured",
            ));
        }

        if settings.max_nodes == Some(0) {
            return Err(DepscopeError::config_error("Max nodes must be at least 1"));
        }

        if settings.threads == Some(0) {
            return Err(DepscopeError::config_error("Threads must be at least 1"));
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// Validate that the directory of an output path exists
    fn validate_output_path(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(DepscopeError::OutputWrite {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("directory {} does not exist", parent.display()),
                    ),
                });
            }
        }
        Ok(())
    }
}
