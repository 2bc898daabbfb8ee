//! Error handling for depscope
//!
//! This module provides the error taxonomy for graph construction and analysis,
//! a result alias, and error context utilities.

pub mod context;
pub mod types;

pub use context::{OptionExt, ResultExt};
pub use types::{DepscopeError, ErrorSeverity, Result};
