//! User-facing message templates.
//!
//! These strings are part of the observable behaviour of the notebook
//! commands and are matched literally by users' tooling; change with care.

use crate::domain::Deletion;
use crate::error::Error;
use crate::format::{describe_available, describe_stored, join_plain, join_with_final_and};

/// Commands `%sqlcmd` accepts.
pub const VALID_COMMANDS: &[&str] = &["snippets"];

fn valid_commands() -> String {
    format!("Valid commands are: {}", join_plain(VALID_COMMANDS))
}

pub(crate) fn missing_command() -> String {
    format!("Missing argument for %sqlcmd. {}", valid_commands())
}

pub(crate) fn unknown_command(command: &str) -> String {
    format!("%sqlcmd has no command: '{command}'. {}", valid_commands())
}

pub(crate) fn not_a_snippet<S: AsRef<str>>(name: &str, available: &[S]) -> String {
    format!("'{name}' is not a snippet. {}", describe_available(available))
}

pub(crate) fn execution_unavailable() -> String {
    "Query execution is not available in this session; \
     use --save NAME to store the query as a snippet"
        .to_string()
}

pub(crate) fn empty_query(name: &str) -> String {
    format!("Cannot save an empty query as {name}")
}

pub(crate) fn unknown_magic(line: &str) -> String {
    format!("Expected a %%sql or %sqlcmd command, found: {line}")
}

/// Report of a successful deletion followed by the remaining snippets.
pub(crate) fn deleted<S: AsRef<str>>(deletion: &Deletion, remaining: &[S]) -> String {
    let mut message = format!("{} has been deleted.\n", join_plain(&deletion.removed));
    if !deletion.dangling_dependents.is_empty() {
        message.push_str(&format!(
            "{} depend on {}\n",
            join_plain(&deletion.dangling_dependents),
            deletion.target
        ));
    }
    message.push_str(&describe_stored(remaining));
    message
}

/// Add the force-delete suggestions to a refused safe delete.
pub(crate) fn explain_delete_error(err: Error) -> Error {
    match err {
        Error::DependentsExist {
            ref name,
            ref cascade,
            ..
        } => Error::Usage(format!(
            "{err}\nPass --delete-force to only delete {name}.\n\
             Pass --delete-force-all to delete {}",
            join_with_final_and(cascade)
        )),
        other => other,
    }
}
