use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pridolog")]
#[command(version)]
#[command(about = "Navigate correlated JSON logs across services")]
pub struct Cli {
    /// Workspace directory holding the service logs
    #[arg(short, long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every log line logged under a gid
    Refs { gid: String },

    /// Jump from a request line to its counterpart in another service's log
    Definition {
        file: PathBuf,
        /// 1-based line number
        line: usize,
    },

    /// List begin/end task pairs of a log file
    Tasks { file: PathBuf },

    /// List slow gaps between consecutive lines of the same task
    Slow {
        file: PathBuf,
        /// Report gaps longer than this (defaults to settings)
        #[arg(long)]
        min_ms: Option<u64>,
    },

    /// List errors, warnings and unparsable lines of a log file
    Problems { file: PathBuf },

    /// Print the service routing table
    Services,
}
