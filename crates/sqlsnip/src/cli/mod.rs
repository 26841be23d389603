//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `run`: Execute a notebook session script
//!
//! # Global Flags
//!
//! - `--json`: Output one JSON object per cell
//!
//! # Example
//!
//! ```bash
//! sqlsnip run session.sql
//! sqlsnip run --fail-fast --case-insensitive - < session.sql
//! ```

mod args;
mod execute;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use args::RunArgs;

/// sqlsnip - named SQL snippets with dependency-aware deletion
///
/// Replays notebook-style scripts of `%%sql --save` cells and
/// `%sqlcmd snippets` commands against an in-memory snippet store.
#[derive(Parser, Debug)]
#[command(name = "sqlsnip")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a session script
    ///
    /// Each `%%sql` or `%sqlcmd` cell is executed in order against a fresh
    /// store. Outputs go to stdout and errors to stderr.
    Run(RunArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Fails if the script or configuration cannot be read, or if any cell
    /// of the script failed.
    pub async fn execute(&self) -> Result<()> {
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Some(Commands::Run(args)) => execute::execute_run(args, output_mode).await,
            None => {
                println!("sqlsnip snippet session runner");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}
