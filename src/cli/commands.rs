//! Command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::args::{Args, Commands};
use crate::config::{self, CliArgs, DEFAULT_CONFIG_FILE};
use crate::core::{find_cycles, Analyzer, ImpactIndex};
use crate::error::{DepscopeError, Result};
use crate::models::code::Repository;
use crate::models::config::Settings;
use crate::output::{create_formatter, create_progress_callback, create_writer, ProgressReporter};
use crate::parsers::RepositoryParser;

/// Available commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the dependency graph
    Graph { repository: PathBuf },
    /// List import cycles
    Cycles {
        repository: PathBuf,
        fail_on_cycles: bool,
    },
    /// List the dependents of one file
    Impact {
        repository: PathBuf,
        target: String,
        max_hops: Option<usize>,
    },
    /// Full analysis report
    Report {
        repository: PathBuf,
        blast_radius: bool,
    },
    /// Initialize a default configuration file
    Init { path: PathBuf, force: bool },
}

/// What a successful command found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// `cycles --fail-on-cycles` found this many cycles
    CyclesFound(usize),
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::CyclesFound(_) => 1,
        }
    }
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: &Args) -> Self {
        match &args.command {
            Commands::Graph { repository } => Command::Graph {
                repository: repository.clone(),
            },
            Commands::Cycles {
                repository,
                fail_on_cycles,
            } => Command::Cycles {
                repository: repository.clone(),
                fail_on_cycles: *fail_on_cycles,
            },
            Commands::Impact {
                repository,
                target,
                max_hops,
            } => Command::Impact {
                repository: repository.clone(),
                target: target.clone(),
                max_hops: *max_hops,
            },
            Commands::Report {
                repository,
                blast_radius,
            } => Command::Report {
                repository: repository.clone(),
                blast_radius: *blast_radius,
            },
            Commands::Init { path, force } => Command::Init {
                path: path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
                force: *force,
            },
        }
    }

    /// Repository description this command reads, if any
    pub fn repository(&self) -> Option<&Path> {
        match self {
            Command::Graph { repository }
            | Command::Cycles { repository, .. }
            | Command::Impact { repository, .. }
            | Command::Report { repository, .. } => Some(repository),
            Command::Init { .. } => None,
        }
    }

    /// Validate the command arguments
    pub fn validate(&self) -> Result<()> {
        if let Some(repository) = self.repository() {
            if !repository.is_file() {
                return Err(DepscopeError::FileRead {
                    path: repository.to_path_buf(),
                    message: "repository description not found".to_string(),
                });
            }
        }
        if let Command::Impact { target, .. } = self {
            if target.trim().is_empty() {
                return Err(DepscopeError::validation("impact target is empty", Vec::new()));
            }
        }
        Ok(())
    }

    /// Load settings from every configuration source, then run
    pub fn execute(&self, cli_args: CliArgs) -> Result<Outcome> {
        if let Command::Init { path, force } = self {
            return init_config(path, *force);
        }

        self.validate()?;
        let settings = config::load_config(cli_args)?;
        tracing::debug!(?settings, "resolved settings");
        self.execute_with(&settings)
    }

    /// Run with already resolved settings
    pub fn execute_with(&self, settings: &Settings) -> Result<Outcome> {
        let formatter = create_formatter(
            &settings.output_format,
            settings.use_colors,
            settings.verbose,
            settings.quiet,
        );
        let analyzer = Analyzer::new(settings.clone());
        let mut outcome = Outcome::Success;

        let output = match self {
            Command::Graph { repository } => {
                let graph = analyzer.build_graph(&load_repository(repository)?)?;
                formatter.format_graph(&graph)?
            }
            Command::Cycles {
                repository,
                fail_on_cycles,
            } => {
                let graph = analyzer.build_graph(&load_repository(repository)?)?;
                let cycles = find_cycles(&graph)?;
                if *fail_on_cycles && !cycles.is_empty() {
                    outcome = Outcome::CyclesFound(cycles.len());
                }
                formatter.format_cycles(&cycles)?
            }
            Command::Impact {
                repository,
                target,
                max_hops,
            } => {
                let graph = analyzer.build_graph(&load_repository(repository)?)?;
                let index = ImpactIndex::new(&graph)?;
                let impact = match max_hops {
                    Some(hops) => index.impact_within(target, *hops)?,
                    None => index.impact_of(target)?,
                };
                formatter.format_impact(&impact)?
            }
            Command::Report {
                repository,
                blast_radius,
            } => {
                let repository = load_repository(repository)?;
                let analyzer = analyzer.with_blast_radius(*blast_radius);
                let report = if *blast_radius && settings.show_progress && !settings.quiet {
                    let reporter = Arc::new(ProgressReporter::new(settings.quiet, settings.verbose));
                    reporter.start(repository.files.len(), "Ranking files by blast radius");
                    let report = analyzer
                        .analyze_with_progress(&repository, create_progress_callback(Arc::clone(&reporter)));
                    reporter.finish("Blast radius ranking complete");
                    report?
                } else {
                    analyzer.analyze(&repository)?
                };
                formatter.format_report(&report)?
            }
            Command::Init { path, force } => return init_config(path, *force),
        };

        write_output(&output, settings.output_file.as_deref())?;
        Ok(outcome)
    }
}

fn load_repository(path: &Path) -> Result<Repository> {
    RepositoryParser::parse_file(path)
}

fn write_output(output: &str, output_file: Option<&Path>) -> Result<()> {
    let writer = create_writer(output_file);
    if output.is_empty() || output.ends_with('\n') {
        writer.write(output)
    } else {
        writer.write(&format!("{}\n", output))
    }
}

fn init_config(path: &Path, force: bool) -> Result<Outcome> {
    if path.exists() && !force {
        eprintln!("Configuration file already exists at: {}", path.display());
        eprintln!("Use --force to overwrite it.");
        return Ok(Outcome::Success);
    }

    config::create_default_config(path)?;
    eprintln!("Created default configuration file at: {}", path.display());
    eprintln!("Every setting is commented out; uncomment the ones you want to change.");
    Ok(Outcome::Success)
}
