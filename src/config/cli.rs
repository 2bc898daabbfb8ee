//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::{Args, Convention, OutputFormat as CliOutputFormat};
use crate::error::Result;
use crate::models::config::{OutputFormat, PartialSettings, ResolutionConvention};

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// Settings-related command-line arguments
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub convention: Option<ResolutionConvention>,
    pub external: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub max_nodes: Option<usize>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub no_parallel: bool,
    pub threads: Option<usize>,
    pub quiet: bool,
    pub verbose: u8,
    pub no_colors: bool,
    pub no_progress: bool,
    pub config: Option<PathBuf>,
}

impl From<&Args> for CliArgs {
    fn from(args: &Args) -> Self {
        Self {
            convention: args.convention.map(|c| match c {
                Convention::RelativePath => ResolutionConvention::RelativePath,
                Convention::PackageRoot => ResolutionConvention::PackageRoot,
                Convention::CustomResolver => ResolutionConvention::CustomResolver,
            }),
            external: if args.external.is_empty() {
                None
            } else {
                Some(args.external.clone())
            },
            exclude: if args.exclude.is_empty() {
                None
            } else {
                Some(args.exclude.clone())
            },
            max_nodes: args.max_nodes,
            output_format: args.output.map(|format| match format {
                CliOutputFormat::Text => OutputFormat::Text,
                CliOutputFormat::Json => OutputFormat::Json,
                CliOutputFormat::Csv => OutputFormat::Csv,
                CliOutputFormat::Dot => OutputFormat::Dot,
            }),
            output_file: args.output_file.clone(),
            no_parallel: args.no_parallel,
            threads: args.threads,
            quiet: args.quiet,
            verbose: args.verbose,
            no_colors: args.no_colors,
            no_progress: args.no_progress,
            config: args.config.clone(),
        }
    }
}

impl CliConfig {
    /// Create a new CLI configuration source
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30,
        }
    }

    /// Create a CLI configuration source from parsed arguments
    pub fn from_args(args: &Args) -> Self {
        Self::new(CliArgs::from(args))
    }

    /// Set the priority for this configuration source
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Get the config file path if specified
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings::default();

        if let Some(convention) = self.args.convention {
            settings.convention = Some(convention);
        }

        if let Some(external) = &self.args.external {
            settings.external_modules = Some(external.clone());
        }

        if let Some(exclude) = &self.args.exclude {
            settings.exclude_patterns = Some(exclude.clone());
        }

        if let Some(max_nodes) = self.args.max_nodes {
            settings.max_nodes = Some(max_nodes);
        }

        if let Some(format) = self.args.output_format {
            settings.output_format = Some(format);
        }

        if let Some(output_file) = &self.args.output_file {
            settings.output_file = Some(output_file.clone());
        }

        if self.args.no_parallel {
            settings.parallel = Some(false);
        }

        if let Some(threads) = self.args.threads {
            settings.threads = Some(threads);
        }

        if self.args.quiet {
            settings.quiet = Some(true);
        }

        if self.args.verbose > 0 {
            settings.verbose = Some(true);
        }

        if self.args.no_colors {
            settings.use_colors = Some(false);
        }

        if self.args.no_progress {
            settings.show_progress = Some(false);
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
