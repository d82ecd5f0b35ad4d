//! Library side of the `sift` command-line tool.

pub mod cli;
pub mod commands;
pub mod input;
pub mod output;

use anyhow::Result;

use cli::{Cli, Commands};

/// Run a parsed command and return what should be printed.
pub fn run(cli: &Cli) -> Result<String> {
    match &cli.command {
        Commands::Rank(args) => commands::rank(args),
        Commands::Analyze(args) => commands::analyze(args),
    }
}
