use std::fs;

use depscope::config::{load_config_with_env_prefix, CliArgs};
use depscope::models::config::{OutputFormat, ResolutionConvention};
use tempfile::tempdir;

#[test]
fn test_layers_file_env_cli() {
    // A prefix no other test uses, so setting variables here is isolated
    let prefix = "DEPSCOPE_IT_LAYERS";
    std::env::set_var(format!("{}_OUTPUT_FORMAT", prefix), "csv");
    std::env::set_var(format!("{}_MAX_NODES", prefix), "50");

    let dir = tempdir().unwrap();
    let config = dir.path().join("depscope.toml");
    fs::write(
        &config,
        "convention = \"package-root\"\noutput_format = \"json\"\nmax_nodes = 10\n",
    )
    .unwrap();

    let settings = load_config_with_env_prefix(
        CliArgs {
            config: Some(config),
            max_nodes: Some(99),
            ..Default::default()
        },
        prefix,
    )
    .unwrap();

    assert_eq!(settings.resolver.convention, ResolutionConvention::PackageRoot);
    assert_eq!(settings.output_format, OutputFormat::Csv);
    assert_eq!(settings.max_nodes, Some(99));
}

#[test]
fn test_invalid_env_value_is_reported() {
    let prefix = "DEPSCOPE_IT_INVALID";
    std::env::set_var(format!("{}_PARALLEL", prefix), "sometimes");

    let dir = tempdir().unwrap();
    let config = dir.path().join("empty.toml");
    fs::write(&config, "").unwrap();

    let err = load_config_with_env_prefix(
        CliArgs {
            config: Some(config),
            ..Default::default()
        },
        prefix,
    )
    .unwrap_err();
    assert_eq!(err.kind(), "ConfigError");
    assert!(err.is_critical());
}
