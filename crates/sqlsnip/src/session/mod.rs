//! Notebook command layer.
//!
//! A [`Session`] owns a snippet store for its whole lifetime and executes
//! notebook-style cells against it:
//!
//! ```text
//! %%sql --save high_price --no-execute
//! SELECT * FROM "test_store" WHERE price >= 1.50
//!
//! %sqlcmd snippets
//! %sqlcmd snippets high_price
//! %sqlcmd snippets --delete high_price
//! %sqlcmd snippets --delete-force high_price
//! %sqlcmd snippets --delete-force-all high_price
//! ```
//!
//! Commands that need a live database (`tables`, `columns`, `profile`, ...) and
//! query execution itself are not provided.

mod args;
mod messages;

pub use args::{SnippetsArgs, SqlCellArgs, split_args};
pub use messages::VALID_COMMANDS;

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::format::describe_stored;
use crate::scanner::SqlReferenceScanner;
use crate::store::{SharedStore, SnippetStore};
use serde::Serialize;

/// One parsed notebook cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// `%%sql` header words and the query body below it
    Sql {
        /// Words after `%%sql`
        args: Vec<String>,
        /// Lines after the header
        body: String,
    },

    /// `%sqlcmd` words
    SqlCmd {
        /// Words after `%sqlcmd`
        args: Vec<String>,
    },
}

impl Cell {
    /// Parse the text of a single cell.
    ///
    /// # Errors
    ///
    /// Returns `Error::Usage` if the cell does not start with a supported
    /// magic or its arguments cannot be split.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim_start();
        let (header, body) = text.split_once('\n').unwrap_or((text, ""));
        let header = header.trim_end();

        if let Some(rest) = magic_arguments(header, "%%sql") {
            Ok(Cell::Sql {
                args: split_args(rest)?,
                body: body.trim_end().to_string(),
            })
        } else if let Some(rest) = magic_arguments(header, "%sqlcmd") {
            Ok(Cell::SqlCmd {
                args: split_args(rest)?,
            })
        } else if magic_arguments(header, "%sql").is_some() {
            Err(Error::Usage(messages::execution_unavailable()))
        } else {
            Err(Error::Usage(messages::unknown_magic(header)))
        }
    }
}

/// The words following `magic`, if `line` invokes it.
fn magic_arguments<'a>(line: &'a str, magic: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(magic)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

/// Split a script into cell texts.
///
/// Every line starting with `%` opens a new cell. Lines after a `%%sql`
/// header belong to its body. Elsewhere, blank lines and `#` comments are
/// skipped and any other text becomes a cell of its own (which then fails to
/// parse).
pub fn split_cells(script: &str) -> Vec<String> {
    let mut cells: Vec<String> = Vec::new();
    let mut accepts_body = false;

    for line in script.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('%') {
            accepts_body = trimmed.starts_with("%%");
            cells.push(trimmed.to_string());
        } else if accepts_body {
            if let Some(cell) = cells.last_mut() {
                cell.push('\n');
                cell.push_str(line);
            }
        } else if !(trimmed.is_empty() || trimmed.starts_with('#')) {
            accepts_body = true;
            cells.push(trimmed.to_string());
        }
    }

    cells
}

/// Result of running one cell of a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellOutcome {
    /// Position of the cell in the script, starting at 1
    pub index: usize,

    /// First line of the cell
    pub command: String,

    /// Output of a successful cell, if it produced any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Error message of a failed cell
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CellOutcome {
    /// Returns true if the cell failed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A notebook session holding one snippet store.
#[derive(Debug, Clone)]
pub struct Session {
    store: SharedStore,
    config: SessionConfig,
}

impl Session {
    /// Start a session with an empty store configured from `config`.
    pub fn new(config: SessionConfig) -> Self {
        let scanner = SqlReferenceScanner::new(config.identifier_case);
        Self::with_store(SharedStore::new(SnippetStore::with_scanner(scanner)), config)
    }

    /// Start a session over an existing store.
    pub fn with_store(store: SharedStore, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// The session's store.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// The session's configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run a single cell, returning its output if it produced any.
    ///
    /// # Errors
    ///
    /// Returns `Error::Usage` for malformed commands and the store's errors
    /// for failed snippet operations. Every error message names the snippet
    /// involved.
    pub async fn run_cell(&self, text: &str) -> Result<Option<String>> {
        match Cell::parse(text)? {
            Cell::Sql { args, body } => self.run_sql(&args, &body).await,
            Cell::SqlCmd { args } => self.run_sqlcmd(&args).await.map(Some),
        }
    }

    /// Run every cell of a script in order.
    ///
    /// Failing cells are reported in their outcome; with `fail_fast` set, no
    /// cell runs after the first failure.
    pub async fn run_script(&self, script: &str) -> Vec<CellOutcome> {
        let mut outcomes = Vec::new();

        for (position, text) in split_cells(script).iter().enumerate() {
            let index = position + 1;
            let command = text.lines().next().unwrap_or_default().to_string();
            tracing::debug!(cell = index, command = %command, "Running cell");

            let outcome = match self.run_cell(text).await {
                Ok(output) => CellOutcome {
                    index,
                    command,
                    output,
                    error: None,
                },
                Err(err) => {
                    tracing::debug!(cell = index, error = %err, "Cell failed");
                    CellOutcome {
                        index,
                        command,
                        output: None,
                        error: Some(err.to_string()),
                    }
                }
            };

            let failed = outcome.is_error();
            outcomes.push(outcome);
            if failed && self.config.fail_fast {
                break;
            }
        }

        outcomes
    }

    async fn run_sql(&self, args: &[String], body: &str) -> Result<Option<String>> {
        let args: SqlCellArgs = args::parse(args)?;
        let Some(name) = args.save else {
            return Err(Error::Usage(messages::execution_unavailable()));
        };

        if body.trim().is_empty() {
            return Err(Error::Usage(messages::empty_query(&name)));
        }

        self.store.save(&name, body).await?;
        Ok(None)
    }

    async fn run_sqlcmd(&self, args: &[String]) -> Result<String> {
        let Some((command, rest)) = args.split_first() else {
            return Err(Error::Usage(messages::missing_command()));
        };

        match command.as_str() {
            "snippets" => self.run_snippets(&args::parse(rest)?).await,
            other => Err(Error::Usage(messages::unknown_command(other))),
        }
    }

    async fn run_snippets(&self, args: &SnippetsArgs) -> Result<String> {
        if let Some((name, mode)) = args.deletion() {
            let deletion = self
                .store
                .delete(name, mode)
                .await
                .map_err(messages::explain_delete_error)?;
            let remaining = self.store.names().await;
            return Ok(messages::deleted(&deletion, &remaining));
        }

        let Some(name) = &args.name else {
            return Ok(describe_stored(&self.store.names().await));
        };

        match self.store.render(name).await {
            Err(Error::SnippetNotFound(_)) => {
                let available = self.store.names().await;
                Err(Error::Usage(messages::not_a_snippet(name, &available)))
            }
            result => result,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
