//! Output formatting for CLI commands.
//!
//! Cell outcomes are printed either as text (outputs on stdout, errors on
//! stderr) or as one JSON object per cell for programmatic use.

use crate::session::CellOutcome;
use colored::Colorize;
use serde::Serialize;
use std::env;
use std::io::{self, Write};

/// Output mode for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text
    Text,
    /// JSON for programmatic use
    Json,
}

/// Settings that control how text output is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Read settings from the environment.
    ///
    /// Colors are disabled when `NO_COLOR` is set (any value) or when
    /// `SQLSNIP_COLOR` is `0` or `false`.
    pub fn from_env() -> Self {
        let no_color = env::var_os("NO_COLOR").is_some();
        let disabled = env::var("SQLSNIP_COLOR")
            .is_ok_and(|value| value == "0" || value.eq_ignore_ascii_case("false"));
        Self {
            use_colors: !(no_color || disabled),
        }
    }
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Print a value as a single line of JSON.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

/// Print one cell outcome.
pub fn print_outcome(
    outcome: &CellOutcome,
    mode: OutputMode,
    config: &OutputConfig,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(outcome),
        OutputMode::Text => {
            if let Some(output) = &outcome.output {
                writeln!(io::stdout().lock(), "{output}")?;
            }
            if let Some(message) = &outcome.error {
                writeln!(
                    io::stderr().lock(),
                    "{} {message}",
                    error("UsageError:", config)
                )?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_without_colors_is_plain() {
        let config = OutputConfig { use_colors: false };
        assert_eq!(error("UsageError:", &config), "UsageError:");
    }

    #[test]
    fn test_outcome_json_omits_missing_fields() {
        let outcome = CellOutcome {
            index: 2,
            command: "%sqlcmd snippets".to_string(),
            output: Some("There are no stored snippets".to_string()),
            error: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "index": 2,
                "command": "%sqlcmd snippets",
                "output": "There are no stored snippets",
            })
        );
    }
}
