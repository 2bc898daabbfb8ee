//! Shared utilities

pub mod path_resolver;

pub use path_resolver::{normalize_path, top_level_name, ImportResolver, PathResolver};
