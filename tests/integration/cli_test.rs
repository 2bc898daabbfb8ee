use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use clap::Parser;
use depscope::cli::args::{Args, Commands, Convention, OutputFormat};
use tempfile::tempdir;

use crate::fixtures::generate_large_repository::{generate_chain_repository, write_repository_json};

/// Run the depscope binary isolated from the user's configuration
fn depscope(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_depscope"))
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run depscope")
}

fn chain_json(dir: &Path, closed: bool) -> PathBuf {
    write_repository_json(dir, &generate_chain_repository(3, closed))
}

#[test]
fn test_cli_args_parsing() {
    let args = Args::try_parse_from(["depscope", "graph", "repo.json"]).unwrap();
    assert_eq!(
        args.command,
        Commands::Graph {
            repository: PathBuf::from("repo.json")
        }
    );
    assert_eq!(args.output, None);
    assert_eq!(args.convention, None);
    assert!(args.exclude.is_empty());
    assert!(!args.quiet);
    assert_eq!(args.verbose, 0);

    let args = Args::try_parse_from([
        "depscope",
        "--convention",
        "package-root",
        "--exclude",
        "tests/**",
        "--exclude",
        "build/**",
        "--max-nodes",
        "500",
        "--output",
        "csv",
        "--quiet",
        "report",
        "repo.json",
        "--blast-radius",
    ])
    .unwrap();
    assert_eq!(args.convention, Some(Convention::PackageRoot));
    assert_eq!(args.exclude, vec!["tests/**".to_string(), "build/**".to_string()]);
    assert_eq!(args.max_nodes, Some(500));
    assert_eq!(args.output, Some(OutputFormat::Csv));
    assert!(args.quiet);
    assert!(matches!(args.command, Commands::Report { blast_radius: true, .. }));
}

#[test]
fn test_cli_invalid_output_format() {
    assert!(Args::try_parse_from(["depscope", "--output", "xml", "graph", "r.json"]).is_err());
}

#[test]
fn test_impact_requires_target() {
    assert!(Args::try_parse_from(["depscope", "impact", "repo.json"]).is_err());
}

#[test]
fn test_binary_graph_json() {
    let dir = tempdir().unwrap();
    let repo = chain_json(dir.path(), false);

    let output = depscope(dir.path(), &["--output", "json", "graph", repo.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(graph["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(graph["edges"][0]["source"], "f0.py");
    assert_eq!(graph["edges"][0]["target"], "f1.py");
    assert_eq!(graph["edges"][0]["type"], "direct");
}

#[test]
fn test_binary_fail_on_cycles_exit_code() {
    let dir = tempdir().unwrap();

    let cyclic = chain_json(dir.path(), true);
    let output = depscope(
        dir.path(),
        &["--quiet", "cycles", cyclic.to_str().unwrap(), "--fail-on-cycles"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Cycles: 1\n");

    // Without the flag, finding cycles is not a failure
    let output = depscope(dir.path(), &["--quiet", "cycles", cyclic.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));

    let acyclic_dir = tempdir().unwrap();
    let acyclic = chain_json(acyclic_dir.path(), false);
    let output = depscope(
        acyclic_dir.path(),
        &["--quiet", "cycles", acyclic.to_str().unwrap(), "--fail-on-cycles"],
    );
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_binary_unknown_target() {
    let dir = tempdir().unwrap();
    let repo = chain_json(dir.path(), false);

    let output = depscope(dir.path(), &["impact", repo.to_str().unwrap(), "nope.py"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("UnknownNodeError"));
    assert!(stderr.contains("nope.py"));
}

#[test]
fn test_binary_impact_quiet() {
    let dir = tempdir().unwrap();
    let repo = chain_json(dir.path(), false);

    let output = depscope(dir.path(), &["-q", "impact", repo.to_str().unwrap(), "f2.py"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "f1.py\t1\nf0.py\t2\n");
}

#[test]
fn test_binary_bad_config_is_critical() {
    let dir = tempdir().unwrap();
    let repo = chain_json(dir.path(), false);
    let config = dir.path().join("broken.toml");
    fs::write(&config, "max_nodes = \"lots\"\n").unwrap();

    let output = depscope(
        dir.path(),
        &["--config", config.to_str().unwrap(), "graph", repo.to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ConfigError"));
}

#[test]
fn test_binary_node_limit() {
    let dir = tempdir().unwrap();
    let repo = chain_json(dir.path(), false);

    let output = depscope(dir.path(), &["--max-nodes", "2", "graph", repo.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("NodeLimitExceeded"));
}

#[test]
fn test_binary_init_then_use_config() {
    let dir = tempdir().unwrap();

    let output = depscope(dir.path(), &["init"]);
    assert!(output.status.success());
    let config = dir.path().join(".depscope.toml");
    assert!(config.exists());

    // The generated file is picked up from the working directory
    fs::write(&config, "output_format = \"csv\"\n").unwrap();
    let repo = chain_json(dir.path(), false);
    let output = depscope(dir.path(), &["graph", repo.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("source,target,type\n"));
}

#[test]
fn test_binary_output_file() {
    let dir = tempdir().unwrap();
    let repo = chain_json(dir.path(), false);
    let out = dir.path().join("graph.dot");

    let output = depscope(
        dir.path(),
        &[
            "--output",
            "dot",
            "--output-file",
            out.to_str().unwrap(),
            "graph",
            repo.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(fs::read_to_string(&out).unwrap().starts_with("digraph"));
}
