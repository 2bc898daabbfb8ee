//! Error context utilities for depscope
//!
//! Extension traits that attach context to failures and turn missing values
//! into typed errors.

use crate::error::{DepscopeError, Result};
use std::path::Path;

/// Extension trait for Result to add context to errors
pub trait ResultExt<T, E> {
    /// Add context to an error with a custom message
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;

    /// Add file context to an error
    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|err| DepscopeError::Config {
            message: format!("{}: {}", context(), err),
        })
    }

    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|err| DepscopeError::FileRead {
            path: path.as_ref().to_path_buf(),
            message: err.to_string(),
        })
    }
}

/// Extension trait for Option to convert to Result with a custom error
pub trait OptionExt<T> {
    /// Convert Option to Result with a custom error
    fn ok_or_error<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> DepscopeError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_error<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> DepscopeError,
    {
        self.ok_or_else(err_fn)
    }
}
