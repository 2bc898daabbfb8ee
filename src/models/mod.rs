//! Data models for repositories, dependency graphs, configuration and reports

pub mod analysis;
pub mod code;
pub mod config;
pub mod dependency_graph;
