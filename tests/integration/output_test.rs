use std::fs;

use depscope::{
    models::config::{OutputFormat, Settings},
    output::{create_formatter, create_writer},
    AnalysisReport, Analyzer,
};
use tempfile::tempdir;

use crate::fixtures::generate_large_repository::generate_layered_repository;

fn layered_report() -> AnalysisReport {
    let settings = Settings {
        show_progress: false,
        ..Settings::default()
    };
    Analyzer::new(settings)
        .with_blast_radius(true)
        .analyze(&generate_layered_repository(3, 4))
        .unwrap()
}

#[test]
fn test_report_in_every_format() {
    let report = layered_report();

    for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Csv, OutputFormat::Dot] {
        let output = create_formatter(&format, false, true, false)
            .format_report(&report)
            .unwrap();
        assert!(!output.is_empty(), "{} output is empty", format);
    }
}

#[test]
fn test_json_report_round_trip() {
    let report = layered_report();
    let json = create_formatter(&OutputFormat::Json, false, false, false)
        .format_report(&report)
        .unwrap();

    let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.graph, report.graph);
    assert_eq!(parsed.statistics, report.statistics);
    assert_eq!(parsed.blast_radius, report.blast_radius);
    assert_eq!(parsed.generated_at, report.generated_at);
}

#[test]
fn test_csv_report_written_to_file() {
    let report = layered_report();
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.csv");

    let csv = create_formatter(&OutputFormat::Csv, false, false, false)
        .format_report(&report)
        .unwrap();
    create_writer(Some(&path)).write(&csv).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    let rows: Vec<&str> = written.lines().collect();
    assert_eq!(rows.len(), 1 + 12);
    // Imported by two middle-layer files, which three top-layer files import
    assert_eq!(rows[9], "layer2/mod0.py,0,2,0,0,false,5");
}
