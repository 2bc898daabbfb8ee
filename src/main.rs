use std::process;

use depscope::{
    cli::{Args, Command},
    config::CliArgs,
    error::{DepscopeError, ErrorSeverity},
    NAME, VERSION,
};
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    init_logging(args.verbose);
    tracing::debug!("{} v{}", NAME, VERSION);

    let command = Command::from_args(&args);
    let exit_code = match command.execute(CliArgs::from(&args)) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => report_error(&err),
    };

    process::exit(exit_code);
}

/// Log to stderr at a level picked by `-v`, unless RUST_LOG says otherwise
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print an error with its kind, paths and suggestion; return the exit code
fn report_error(err: &DepscopeError) -> i32 {
    eprintln!("\nError [{}]: {}", err.kind(), err.user_message());

    let paths = err.implicated_paths();
    if !paths.is_empty() {
        eprintln!("Paths: {}", paths.join(", "));
    }

    if let Some(suggestion) = err.suggestion() {
        eprintln!("Suggestion: {}", suggestion);
    }

    let exit_code = match err.severity() {
        ErrorSeverity::Warning => 0,
        ErrorSeverity::Error => 1,
        ErrorSeverity::Critical => 2,
    };

    if exit_code > 0 {
        eprintln!("\nExiting with code {} due to {}", exit_code, err.severity());
    }

    exit_code
}
