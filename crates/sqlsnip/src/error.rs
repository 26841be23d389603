//! Error types for sqlsnip operations.

use crate::format::join_plain;
use std::io;
use thiserror::Error;

/// The error type for sqlsnip operations.
///
/// Store errors are raised before any mutation happens, so a failed operation
/// always leaves the registry exactly as it was.
#[derive(Debug, Error)]
pub enum Error {
    /// No snippet is registered under this name.
    #[error("No such saved snippet found : {0}")]
    SnippetNotFound(String),

    /// A snippet with this name is already registered.
    #[error("A snippet named '{0}' already exists")]
    DuplicateName(String),

    /// Safe deletion was refused because other snippets depend on the target.
    #[error("The following tables are dependent on {name}: {}.", join_plain(.dependents))]
    DependentsExist {
        /// The snippet that was asked to be deleted
        name: String,
        /// Direct dependents, in insertion order
        dependents: Vec<String>,
        /// Everything a cascading delete would remove, dependents first and `name` last
        cascade: Vec<String>,
    },

    /// Saving would close a cycle through dependents left dangling by a force delete.
    #[error("Saving '{name}' would create a circular reference through '{through}'")]
    CircularReference {
        /// The snippet being saved
        name: String,
        /// The referenced snippet that already depends on `name`
        through: String,
    },

    /// A snippet references another snippet that has since been force-deleted.
    #[error("Snippet '{name}' references '{missing}', which is no longer saved")]
    DanglingReference {
        /// The snippet being rendered
        name: String,
        /// The dependency that no longer exists
        missing: String,
    },

    /// The snippet name is empty or contains whitespace.
    #[error("Invalid snippet name: '{0}'")]
    InvalidName(String),

    /// A notebook command was malformed or referred to something unknown.
    #[error("{0}")]
    Usage(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized Result type for sqlsnip operations.
pub type Result<T> = std::result::Result<T, Error>;
