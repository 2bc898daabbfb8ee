//! Command-line argument parsing

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// depscope - source dependency graph, cycle and impact analyzer
#[derive(Parser, Debug)]
#[command(name = "depscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build file-level dependency graphs, find import cycles and measure change impact")]
#[command(long_about = "depscope reads a repository description (files with their raw import strings, \
as produced by a source scanner), resolves every import to a file of the repository, and builds the \
file-level dependency graph. It reports import cycles and, for any file, every file that depends on it \
directly or transitively together with the number of hops.")]
#[command(after_help = "EXAMPLES:

Graphs:
    # Print the dependency graph
    depscope graph repo.json

    # Export it for Graphviz
    depscope --output dot graph repo.json --output-file deps.dot

Cycles:
    # List import cycles
    depscope cycles repo.json

    # Fail a CI job when any cycle exists
    depscope --quiet cycles repo.json --fail-on-cycles

Impact:
    # Everything affected by a change to one file
    depscope impact repo.json app/models/user.py

    # Only files at most two imports away
    depscope impact repo.json app/models/user.py --max-hops 2

Reports:
    # Full analysis as JSON, with every file ranked by blast radius
    depscope --output json report repo.json --blast-radius

Resolution:
    # Resolve package-style imports from source roots
    depscope --convention package-root graph repo.json

    # Treat some top-level modules as third-party
    depscope --external os --external requests report repo.json

Configuration:
    # Use a specific configuration file
    depscope --config ./depscope.toml report repo.json

    # Create a default configuration file
    depscope init
")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, value_name = "FILE", help = "Path to configuration file (defaults to .depscope.toml in the current directory, then the home directory)")]
    pub config: Option<PathBuf>,

    /// Import resolution convention
    #[arg(long, global = true, value_enum, help = "How raw imports are matched to repository files")]
    pub convention: Option<Convention>,

    /// Top-level module names treated as third-party
    #[arg(long = "external", global = true, value_name = "MODULE", help = "Top-level module treated as third-party (can be specified multiple times)")]
    pub external: Vec<String>,

    /// Exclude files matching these glob patterns
    #[arg(short, long, global = true, value_name = "PATTERN", help = "Glob pattern for repository files to leave out of the graph (can be specified multiple times)")]
    pub exclude: Vec<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, help = "Output format: 'text' for humans, 'json' for machines, 'csv' for spreadsheets, 'dot' for Graphviz")]
    pub output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(long, global = true, value_name = "FILE", help = "File to write output to (uses stdout if not specified)")]
    pub output_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true, help = "Disable colored output")]
    pub no_colors: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, help = "Suppress non-essential output (only show results)")]
    pub quiet: bool,

    /// Increase logging verbosity
    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase logging verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    /// Disable progress bars
    #[arg(long, global = true, help = "Disable progress bars (useful for CI environments or when redirecting output)")]
    pub no_progress: bool,

    /// Disable parallel processing
    #[arg(long, global = true, help = "Compute whole-repository impact on a single thread")]
    pub no_parallel: bool,

    /// Maximum number of files to analyze
    #[arg(long, global = true, value_name = "COUNT", help = "Refuse repositories with more files than this")]
    pub max_nodes: Option<usize>,

    /// Worker threads for parallel analysis
    #[arg(long, global = true, value_name = "COUNT", help = "Worker threads for parallel analysis (defaults to the number of CPUs)")]
    pub threads: Option<usize>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the dependency graph of a repository
    Graph {
        /// Repository description (JSON)
        repository: PathBuf,
    },

    /// List import cycles
    Cycles {
        /// Repository description (JSON)
        repository: PathBuf,

        /// Exit with status 1 when any cycle is found
        #[arg(long)]
        fail_on_cycles: bool,
    },

    /// List every file affected by a change to one file
    Impact {
        /// Repository description (JSON)
        repository: PathBuf,

        /// Path of the changed file, as it appears in the repository
        target: String,

        /// Only report dependents at most this many imports away
        #[arg(long, value_name = "HOPS")]
        max_hops: Option<usize>,
    },

    /// Full analysis report
    Report {
        /// Repository description (JSON)
        repository: PathBuf,

        /// Rank every file by its number of transitive dependents
        #[arg(long)]
        blast_radius: bool,
    },

    /// Create a default configuration file
    Init {
        /// Where to write it (defaults to .depscope.toml in the current directory)
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
    /// Graphviz DOT output
    Dot,
}

/// Import resolution conventions
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Convention {
    /// Exact path, then relative to the importing file
    RelativePath,
    /// Exact path, then source roots, then relative to the importing file
    PackageRoot,
    /// Configured aliases first, then the package-root rules
    CustomResolver,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
