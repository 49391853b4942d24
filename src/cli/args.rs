use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "usedef")]
#[command(about = "Detects reads of variables before they are assigned", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the nearest .usedef.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check programs for use-before-definition errors
    Check {
        /// JSON-encoded programs to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Disable colored output
        #[arg(long = "no-color")]
        no_color: bool,

        /// Number of worker threads (0 = use all cores)
        #[arg(short = 'j', long = "jobs", default_value = "0")]
        jobs: usize,

        /// Bound on reaching-definitions passes
        #[arg(long = "max-iterations")]
        max_iterations: Option<usize>,
    },

    /// Print the control flow graph of a program as Graphviz DOT
    Cfg {
        /// JSON-encoded program
        file: PathBuf,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
