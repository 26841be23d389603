//! Argument parsing for notebook commands.
//!
//! Command lines are split shell-style and handed to clap, so flags behave
//! the same way they do on a real command line.

use crate::domain::DeleteMode;
use crate::error::{Error, Result};
use clap::{ArgGroup, Parser};

/// Arguments of a `%%sql` cell header.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "%%sql",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct SqlCellArgs {
    /// Connection string; accepted for compatibility, no connection is opened
    pub connection: Option<String>,

    /// Save the cell body as a snippet with this name
    #[arg(long, value_name = "NAME")]
    pub save: Option<String>,

    /// Do not execute the query
    #[arg(long)]
    pub no_execute: bool,
}

/// Arguments of `%sqlcmd snippets`.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "%sqlcmd snippets",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
#[command(group(
    ArgGroup::new("deletion").args(["delete", "delete_force", "delete_force_all"])
))]
pub struct SnippetsArgs {
    /// Snippet to display as a standalone query
    #[arg(conflicts_with = "deletion")]
    pub name: Option<String>,

    /// Delete a snippet that nothing depends on
    #[arg(short = 'd', long, value_name = "NAME")]
    pub delete: Option<String>,

    /// Delete a snippet even if other snippets depend on it
    #[arg(short = 'D', long, value_name = "NAME")]
    pub delete_force: Option<String>,

    /// Delete a snippet and every snippet that depends on it
    #[arg(short = 'A', long, value_name = "NAME")]
    pub delete_force_all: Option<String>,
}

impl SnippetsArgs {
    /// The requested deletion, if any.
    pub fn deletion(&self) -> Option<(&str, DeleteMode)> {
        if let Some(name) = &self.delete {
            Some((name.as_str(), DeleteMode::Safe))
        } else if let Some(name) = &self.delete_force {
            Some((name.as_str(), DeleteMode::Force))
        } else {
            self.delete_force_all
                .as_deref()
                .map(|name| (name, DeleteMode::Cascade))
        }
    }
}

/// Parse clap arguments, turning parse failures into usage errors.
pub(crate) fn parse<P: Parser>(words: &[String]) -> Result<P> {
    P::try_parse_from(words).map_err(|e| {
        let rendered = e.to_string();
        let first_line = rendered.lines().next().unwrap_or_default();
        Error::Usage(
            first_line
                .strip_prefix("error: ")
                .unwrap_or(first_line)
                .to_string(),
        )
    })
}

/// Split a command line into words.
///
/// Whitespace separates words; single or double quotes group text containing
/// whitespace and are removed.
///
/// # Errors
///
/// Returns `Error::Usage` for an unterminated quote.
pub fn split_args(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(Error::Usage(format!("Unterminated {q} quote in: {line}")));
    }
    if in_word {
        words.push(current);
    }

    Ok(words)
}
