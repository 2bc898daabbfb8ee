//! Output formatting and writing functionality

mod formatters;
mod progress;
mod writers;

pub use self::progress::{create_progress_callback, ProgressReporter};
pub use self::writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use crate::error::Result;
use crate::models::analysis::{AnalysisReport, Impact};
use crate::models::config::OutputFormat;
use crate::models::dependency_graph::DependencyGraph;

/// Trait for different output formatters
pub trait Formatter {
    /// Format a dependency graph
    fn format_graph(&self, graph: &DependencyGraph) -> Result<String>;

    /// Format import cycles
    fn format_cycles(&self, cycles: &[Vec<String>]) -> Result<String>;

    /// Format the dependents of a changed file
    fn format_impact(&self, impact: &Impact) -> Result<String>;

    /// Format a full analysis report
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub use_colors: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(use_colors: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            use_colors,
            verbose,
            quiet,
        }
    }
}

impl Formatter for TextFormatter {
    fn format_graph(&self, graph: &DependencyGraph) -> Result<String> {
        if self.quiet {
            return Ok(format!("Files: {}, Edges: {}\n", graph.nodes.len(), graph.edges.len()));
        }
        Ok(formatters::format_graph_text(graph, self.use_colors, self.verbose))
    }

    fn format_cycles(&self, cycles: &[Vec<String>]) -> Result<String> {
        if self.quiet {
            return Ok(format!("Cycles: {}\n", cycles.len()));
        }
        Ok(formatters::format_cycles_text(cycles, self.use_colors))
    }

    fn format_impact(&self, impact: &Impact) -> Result<String> {
        // Quiet output is one `path<TAB>hops` line per dependent
        if self.quiet {
            let mut output = String::new();
            for (hops, paths) in impact.by_distance() {
                for path in paths {
                    output.push_str(&format!("{}\t{}\n", path, hops));
                }
            }
            return Ok(output);
        }
        Ok(formatters::format_impact_text(impact, self.use_colors, self.verbose))
    }

    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.quiet {
            let stats = &report.statistics;
            let mut output = format!(
                "Files: {}, Edges: {}, Cycles: {}\n",
                stats.total_nodes,
                stats.total_edges,
                report.cycles.len()
            );
            if stats.unresolved_edges > 0 {
                output.push_str(&format!("Unresolved imports: {}\n", stats.unresolved_edges));
            }
            return Ok(output);
        }
        Ok(formatters::format_report_text(report, self.use_colors, self.verbose))
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for JsonFormatter {
    fn format_graph(&self, graph: &DependencyGraph) -> Result<String> {
        formatters::to_json(graph)
    }

    fn format_cycles(&self, cycles: &[Vec<String>]) -> Result<String> {
        formatters::format_cycles_json(cycles)
    }

    fn format_impact(&self, impact: &Impact) -> Result<String> {
        formatters::to_json(impact)
    }

    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        formatters::to_json(report)
    }
}

/// CSV formatter for spreadsheet analysis
pub struct CsvFormatter;

impl CsvFormatter {
    /// Create a new CSV formatter
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for CsvFormatter {
    fn format_graph(&self, graph: &DependencyGraph) -> Result<String> {
        formatters::format_graph_csv(graph)
    }

    fn format_cycles(&self, cycles: &[Vec<String>]) -> Result<String> {
        formatters::format_cycles_csv(cycles)
    }

    fn format_impact(&self, impact: &Impact) -> Result<String> {
        formatters::format_impact_csv(impact)
    }

    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        formatters::format_report_csv(report)
    }
}

/// Graphviz DOT formatter
pub struct DotFormatter;

impl DotFormatter {
    /// Create a new DOT formatter
    pub fn new() -> Self {
        Self
    }
}

impl Default for DotFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for DotFormatter {
    fn format_graph(&self, graph: &DependencyGraph) -> Result<String> {
        Ok(graph.to_dot())
    }

    fn format_cycles(&self, cycles: &[Vec<String>]) -> Result<String> {
        Ok(formatters::format_cycles_dot(cycles))
    }

    fn format_impact(&self, impact: &Impact) -> Result<String> {
        Ok(formatters::format_impact_dot(impact))
    }

    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        Ok(report.graph.to_dot())
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(
    format: &OutputFormat,
    use_colors: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_colors, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
        OutputFormat::Csv => Box::new(CsvFormatter::new()),
        OutputFormat::Dot => Box::new(DotFormatter::new()),
    }
}
