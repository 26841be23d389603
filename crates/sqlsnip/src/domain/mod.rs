//! Domain types for the snippet store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named, saved query fragment.
///
/// Snippets are immutable once saved. `direct_dependencies` is a historical
/// record of what the query referenced when it was saved and is not revised
/// when those snippets are later removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Unique name, also the name other queries use to reference this snippet
    pub name: String,

    /// The query fragment exactly as provided
    pub query_text: String,

    /// Snippets referenced by `query_text` as tables, in first-reference order
    pub direct_dependencies: Vec<String>,

    /// Insertion order; never reused
    pub sequence_index: u64,

    /// When the snippet was saved
    pub saved_at: DateTime<Utc>,
}

impl Snippet {
    /// Returns true if this snippet's query referenced `name` when it was saved.
    pub fn depends_on(&self, name: &str) -> bool {
        self.direct_dependencies.iter().any(|dep| dep == name)
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// How a delete request treats snippets that depend on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeleteMode {
    /// Refuse when any snippet depends on the target
    Safe,

    /// Remove only the target, leaving dependents with a dangling reference
    Force,

    /// Remove the target together with every transitive dependent
    Cascade,
}

impl fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteMode::Safe => write!(f, "delete"),
            DeleteMode::Force => write!(f, "delete-force"),
            DeleteMode::Cascade => write!(f, "delete-force-all"),
        }
    }
}

/// The outcome of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
    /// The snippet the delete was addressed to
    pub target: String,

    /// The policy that was applied
    pub mode: DeleteMode,

    /// Every removed name, in removal order (dependents first, `target` last)
    pub removed: Vec<String>,

    /// Direct dependents left holding a reference to `target` (force delete only)
    pub dangling_dependents: Vec<String>,
}

/// Validate a snippet name.
///
/// Names must be non-empty and free of whitespace, since they are typed as
/// single command arguments and referenced as table names.
///
/// Other punctuation is allowed, but a query only reaches such a name through
/// a quoted identifier: `SELECT * FROM "a.b"` references snippet `a.b`, while
/// unquoted `a.b` is a qualified table and `x,y` two tables.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}
