//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Commands
//!
//! - `check` - Test credentials against the API
//! - `discover` - Print the catalog
//! - `sync` - Extract the selected streams

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
