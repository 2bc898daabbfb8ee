//! Output formatting functionality
//!
//! This module provides the rendering helpers behind each formatter.

use crate::error::{DepscopeError, Result};
use crate::models::analysis::{AnalysisReport, Impact};
use crate::models::dependency_graph::{DependencyGraph, EdgeType, GraphStatistics};
use ansi_term::Colour::{Blue, Cyan, Green, Purple, Red, Yellow};
use ansi_term::Style;
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write as _;

/// Blast-radius rows shown in text output unless verbose
const BLAST_RADIUS_PREVIEW: usize = 10;

fn paint(use_colors: bool, style: Style, text: impl AsRef<str>) -> String {
    if use_colors {
        style.paint(text.as_ref()).to_string()
    } else {
        text.as_ref().to_string()
    }
}

fn edge_label(edge_type: EdgeType, use_colors: bool) -> String {
    let style = match edge_type {
        EdgeType::Direct => Style::new(),
        EdgeType::Dynamic => Cyan.normal(),
        EdgeType::External => Purple.normal(),
        _ => Yellow.normal(),
    };
    paint(use_colors, style, edge_type.as_str())
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Render a cycle as `a -> b -> c -> a`
fn cycle_chain(cycle: &[String]) -> String {
    let mut chain = cycle.join(" -> ");
    if let Some(first) = cycle.first() {
        chain.push_str(" -> ");
        chain.push_str(first);
    }
    chain
}

fn format_statistics_text(stats: &GraphStatistics, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Files: {}", stats.total_nodes);
    let _ = writeln!(
        output,
        "Edges: {} (direct {}, dynamic {}, external {}, unresolved {})",
        stats.total_edges,
        stats.direct_edges,
        stats.dynamic_edges,
        stats.external_edges,
        stats.unresolved_edges
    );

    if verbose {
        let _ = writeln!(output, "Isolated files: {}", stats.isolated_files);
        if let Some(file) = &stats.max_fan_in_file {
            let _ = writeln!(
                output,
                "Most imported: {} ({})",
                paint(use_colors, Style::new().bold(), file),
                stats.max_fan_in
            );
        }
        if let Some(file) = &stats.max_fan_out_file {
            let _ = writeln!(
                output,
                "Most imports: {} ({})",
                paint(use_colors, Style::new().bold(), file),
                stats.max_fan_out
            );
        }
    }

    output
}

/// Format a dependency graph as text
pub fn format_graph_text(graph: &DependencyGraph, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}\n", paint(use_colors, Blue.bold(), "Dependency Graph"));
    output.push_str(&format_statistics_text(&graph.statistics(), use_colors, verbose));
    output.push('\n');

    let mut outgoing: HashMap<&str, Vec<(&str, EdgeType)>> = HashMap::new();
    for edge in &graph.edges {
        outgoing
            .entry(edge.source.as_str())
            .or_default()
            .push((edge.target.as_str(), edge.edge_type));
    }

    for node in &graph.nodes {
        let _ = writeln!(output, "{}", paint(use_colors, Style::new().bold(), node));
        for (target, edge_type) in outgoing.get(node.as_str()).into_iter().flatten() {
            let _ = writeln!(output, "  -> {} ({})", target, edge_label(*edge_type, use_colors));
        }
    }

    output
}

/// Format import cycles as text
pub fn format_cycles_text(cycles: &[Vec<String>], use_colors: bool) -> String {
    let mut output = String::new();

    if cycles.is_empty() {
        let _ = writeln!(output, "{}", paint(use_colors, Green.bold(), "No import cycles found"));
        return output;
    }

    let _ = writeln!(
        output,
        "{}",
        paint(
            use_colors,
            Red.bold(),
            format!("Found {}", plural(cycles.len(), "import cycle"))
        )
    );
    for (i, cycle) in cycles.iter().enumerate() {
        let _ = writeln!(
            output,
            "  {}. [{}] {}",
            i + 1,
            plural(cycle.len(), "file"),
            cycle_chain(cycle)
        );
    }

    output
}

/// Format the impact of a change as text
pub fn format_impact_text(impact: &Impact, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Impact of {}: {}",
        paint(use_colors, Blue.bold(), &impact.target),
        plural(impact.len(), "dependent file")
    );

    if impact.is_empty() {
        return output;
    }

    for (hops, paths) in impact.by_distance() {
        let heading = format!("{} away ({})", plural(hops, "hop"), paths.len());
        let _ = writeln!(output, "\n  {}", paint(use_colors, Style::new().bold(), heading));
        for path in paths {
            let _ = writeln!(output, "    {}", path);
        }
    }

    if verbose {
        let _ = writeln!(
            output,
            "\nDirect dependents: {}, furthest: {}",
            impact.direct_dependents().len(),
            plural(impact.max_distance(), "hop")
        );
    }

    output
}

/// Format a full analysis report as text
pub fn format_report_text(report: &AnalysisReport, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();

    let title = if report.repository.is_empty() {
        "Dependency Report".to_string()
    } else {
        format!("Dependency Report: {}", report.repository)
    };
    let _ = writeln!(output, "{}\n", paint(use_colors, Blue.bold(), title));
    if verbose {
        let _ = writeln!(output, "Root: {}", report.root_path);
        let _ = writeln!(output, "Generated: {}", report.generated_at.to_rfc3339());
    }
    output.push_str(&format_statistics_text(&report.statistics, use_colors, verbose));

    output.push('\n');
    output.push_str(&format_cycles_text(&report.cycles, use_colors));

    if !report.external_modules.is_empty() {
        let _ = writeln!(
            output,
            "\n{}",
            paint(use_colors, Style::new().bold(), "External modules:")
        );
        for (module, count) in &report.external_modules {
            let _ = writeln!(output, "  {} ({})", module, plural(*count, "import"));
        }
    }

    if !report.unresolved_imports.is_empty() {
        let _ = writeln!(
            output,
            "\n{}",
            paint(
                use_colors,
                Yellow.bold(),
                format!("Unresolved imports: {}", report.unresolved_imports.len())
            )
        );
        for edge in &report.unresolved_imports {
            let _ = writeln!(output, "  {}: {}", edge.source, edge.target);
        }
    }

    if let Some(ranking) = &report.blast_radius {
        let _ = writeln!(
            output,
            "\n{}",
            paint(use_colors, Style::new().bold(), "Blast radius:")
        );
        let shown = if verbose { ranking.len() } else { BLAST_RADIUS_PREVIEW };
        for entry in ranking.iter().take(shown) {
            let _ = writeln!(
                output,
                "  {:>5}  {} (direct {}, furthest {})",
                entry.dependents, entry.path, entry.direct_dependents, entry.max_distance
            );
        }
        if ranking.len() > shown {
            let _ = writeln!(output, "  ... and {} more", ranking.len() - shown);
        }
    }

    output
}

/// Serialize any value as pretty JSON
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| DepscopeError::JsonSerialize { source: e })
}

/// Format import cycles as JSON
pub fn format_cycles_json(cycles: &[Vec<String>]) -> Result<String> {
    to_json(&json!({
        "cycles": cycles,
        "count": cycles.len(),
    }))
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = writer
        .into_inner()
        .map_err(|e| DepscopeError::io_error(e.into_error()))?;
    String::from_utf8(data).map_err(|e| {
        DepscopeError::io_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Format graph edges as CSV
pub fn format_graph_csv(graph: &DependencyGraph) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["source", "target", "type"])?;
    for edge in &graph.edges {
        writer.write_record([edge.source.as_str(), edge.target.as_str(), edge.edge_type.as_str()])?;
    }
    finish_csv(writer)
}

/// Format import cycles as CSV, one row per member
pub fn format_cycles_csv(cycles: &[Vec<String>]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["cycle", "position", "path"])?;
    for (i, cycle) in cycles.iter().enumerate() {
        for (position, path) in cycle.iter().enumerate() {
            writer.write_record([(i + 1).to_string(), position.to_string(), path.clone()])?;
        }
    }
    finish_csv(writer)
}

/// Format impact as CSV, nearest dependents first
pub fn format_impact_csv(impact: &Impact) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["path", "hops"])?;
    for (hops, paths) in impact.by_distance() {
        for path in paths {
            writer.write_record([path, hops.to_string().as_str()])?;
        }
    }
    finish_csv(writer)
}

/// Format a report as CSV, one row per file
pub fn format_report_csv(report: &AnalysisReport) -> Result<String> {
    #[derive(Default)]
    struct FileRow<'a> {
        imports: HashSet<&'a str>,
        imported_by: HashSet<&'a str>,
        external: usize,
        unresolved: usize,
    }

    let mut rows: HashMap<&str, FileRow> = HashMap::new();
    for edge in &report.graph.edges {
        match edge.edge_type {
            EdgeType::Direct | EdgeType::Dynamic => {
                rows.entry(edge.source.as_str())
                    .or_default()
                    .imports
                    .insert(edge.target.as_str());
                rows.entry(edge.target.as_str())
                    .or_default()
                    .imported_by
                    .insert(edge.source.as_str());
            }
            EdgeType::External => rows.entry(edge.source.as_str()).or_default().external += 1,
            _ => rows.entry(edge.source.as_str()).or_default().unresolved += 1,
        }
    }

    let in_cycle: HashSet<&str> = report.cycles.iter().flatten().map(String::as_str).collect();
    let dependents: BTreeMap<&str, usize> = report
        .blast_radius
        .iter()
        .flatten()
        .map(|entry| (entry.path.as_str(), entry.dependents))
        .collect();

    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "path",
        "imports",
        "imported_by",
        "external",
        "unresolved",
        "in_cycle",
        "dependents",
    ])?;

    let empty = FileRow::default();
    for node in &report.graph.nodes {
        let row = rows.get(node.as_str()).unwrap_or(&empty);
        writer.write_record([
            node.clone(),
            row.imports.len().to_string(),
            row.imported_by.len().to_string(),
            row.external.to_string(),
            row.unresolved.to_string(),
            in_cycle.contains(node.as_str()).to_string(),
            dependents
                .get(node.as_str())
                .map(|n| n.to_string())
                .unwrap_or_default(),
        ])?;
    }

    finish_csv(writer)
}

/// Quote a DOT identifier
fn dot_id(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Format import cycles as DOT, one cluster per cycle
pub fn format_cycles_dot(cycles: &[Vec<String>]) -> String {
    let mut output = String::from("digraph cycles {\n");
    for (i, cycle) in cycles.iter().enumerate() {
        let _ = writeln!(output, "    subgraph cluster_{} {{", i);
        let _ = writeln!(output, "        label = \"cycle {}\";", i + 1);
        for (j, path) in cycle.iter().enumerate() {
            let next = &cycle[(j + 1) % cycle.len()];
            let _ = writeln!(output, "        {} -> {};", dot_id(path), dot_id(next));
        }
        output.push_str("    }\n");
    }
    output.push_str("}\n");
    output
}

/// Format impact as DOT, with edges from each dependent to the target
pub fn format_impact_dot(impact: &Impact) -> String {
    let mut output = String::from("digraph impact {\n");
    let _ = writeln!(output, "    {} [shape = box];", dot_id(&impact.target));
    for (path, hops) in &impact.dependents {
        let _ = writeln!(
            output,
            "    {} -> {} [label = \"{}\"];",
            dot_id(path),
            dot_id(&impact.target),
            hops
        );
    }
    output.push_str("}\n");
    output
}
