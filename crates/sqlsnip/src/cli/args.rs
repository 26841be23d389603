//! CLI argument structs.

use clap::Parser;
use std::path::PathBuf;

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Script to run, or `-` to read from stdin
    pub script: PathBuf,

    /// Configuration file (defaults to `.sqlsnip.yaml` in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stop at the first failing cell
    #[arg(long)]
    pub fail_fast: bool,

    /// Match unquoted table names against snippet names ignoring case
    #[arg(long)]
    pub case_insensitive: bool,
}

impl RunArgs {
    /// Returns true if the script should be read from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.script.as_os_str() == "-"
    }
}
