//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Singer tap for the Dixa exports and integrations APIs
#[derive(Parser, Debug)]
#[command(name = "tap-dixa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test credentials against the API
    Check {
        /// Configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print the catalog of available streams
    Discover {
        /// Configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Sync the selected streams to stdout
    Sync {
        /// Configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Catalog file produced by `discover`
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// State file (JSON); rewritten at every checkpoint
        #[arg(short, long)]
        state: Option<PathBuf>,
    },
}
