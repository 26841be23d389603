//! The snippet dependency store.
//!
//! [`SnippetStore`] is an explicit, per-session catalog of named query
//! fragments. It is synchronous and single-writer; wrap it in a
//! [`SharedStore`] to share it between tasks.
//!
//! # Architecture
//!
//! - `HashMap<String, Snippet>` is the registry, the source of truth for which
//!   snippets exist
//! - [`graph::DependencyGraph`] indexes the dependency relation with petgraph
//!   and answers dependent queries
//! - a boxed [`ReferenceScanner`] resolves dependencies at save time
//!
//! Deletion policies live in `deletion.rs` and query composition in
//! `render.rs`; both are further `impl SnippetStore` blocks.
//!
//! # Example
//!
//! ```
//! use sqlsnip::store::SnippetStore;
//!
//! let mut store = SnippetStore::new();
//! store.save("high_price", "SELECT * FROM stock WHERE price >= 1.50")?;
//! store.save("high_price_a", "SELECT * FROM high_price WHERE symbol = 'a'")?;
//!
//! assert_eq!(store.direct_dependents_of("high_price")?, ["high_price_a"]);
//! # Ok::<(), sqlsnip::error::Error>(())
//! ```

mod deletion;
pub(crate) mod graph;
mod render;
mod shared;

pub use shared::SharedStore;

use crate::domain::{Snippet, is_valid_name};
use crate::error::{Error, Result};
use crate::scanner::{ReferenceScanner, SqlReferenceScanner};
use chrono::Utc;
use graph::DependencyGraph;
use std::collections::HashMap;
use std::fmt;

/// In-memory catalog of snippets and their dependencies.
pub struct SnippetStore {
    /// Snippets indexed by name
    snippets: HashMap<String, Snippet>,

    /// Dependency relation; edge direction is dependent -> dependency
    graph: DependencyGraph,

    /// Resolves which known snippets a query references
    scanner: Box<dyn ReferenceScanner>,

    /// Next sequence index to hand out
    next_sequence: u64,
}

impl fmt::Debug for SnippetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnippetStore")
            .field("snippets", &self.names())
            .field("next_sequence", &self.next_sequence)
            .field("scanner", &"<dyn ReferenceScanner>")
            .finish()
    }
}

impl Default for SnippetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnippetStore {
    /// Create an empty store using the default SQL scanner.
    pub fn new() -> Self {
        Self::with_scanner(SqlReferenceScanner::default())
    }

    /// Create an empty store with a custom reference scanner.
    pub fn with_scanner(scanner: impl ReferenceScanner + 'static) -> Self {
        Self {
            snippets: HashMap::new(),
            graph: DependencyGraph::new(),
            scanner: Box::new(scanner),
            next_sequence: 0,
        }
    }

    /// Save a new snippet.
    ///
    /// Dependencies are resolved against the snippets registered right now: a
    /// referenced name that is not a snippet is treated as a real table.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidName` if `name` is empty or contains whitespace
    /// - `Error::DuplicateName` if `name` is already registered
    /// - `Error::CircularReference` if `name` was force-deleted while other
    ///   snippets still referenced it, and the new query reads from one of them
    pub fn save(&mut self, name: &str, query_text: &str) -> Result<Snippet> {
        // === Phase 1: validation (no mutations) ===
        if !is_valid_name(name) {
            return Err(Error::InvalidName(name.to_string()));
        }
        if self.snippets.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }

        // Insertion order keeps case-insensitive resolution deterministic.
        let known = self.names();
        let mut direct_dependencies: Vec<String> = Vec::new();
        for dep in self.scanner.scan(query_text, &known) {
            let registered = dep != name && known.contains(&dep.as_str());
            if registered && !direct_dependencies.contains(&dep) {
                direct_dependencies.push(dep);
            }
        }

        if let Some(through) = self.graph.find_cycle(name, &direct_dependencies) {
            return Err(Error::CircularReference {
                name: name.to_string(),
                through: through.to_string(),
            });
        }

        // === Phase 2: insertion ===
        let sequence_index = self.next_sequence;
        self.next_sequence += 1;

        let snippet = Snippet {
            name: name.to_string(),
            query_text: query_text.to_string(),
            direct_dependencies,
            sequence_index,
            saved_at: Utc::now(),
        };

        self.graph
            .insert(name, sequence_index, &snippet.direct_dependencies);
        self.snippets.insert(name.to_string(), snippet.clone());

        tracing::debug!(
            snippet = name,
            sequence_index,
            dependencies = ?snippet.direct_dependencies,
            "Saved snippet"
        );

        Ok(snippet)
    }

    /// Look up a snippet by name.
    ///
    /// # Errors
    ///
    /// Returns `Error::SnippetNotFound` if no snippet has this name.
    pub fn get(&self, name: &str) -> Result<&Snippet> {
        self.snippets
            .get(name)
            .ok_or_else(|| Error::SnippetNotFound(name.to_string()))
    }

    /// Returns true if a snippet with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.snippets.contains_key(name)
    }

    /// Number of registered snippets.
    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    /// Returns true if no snippets are registered.
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// All snippets in insertion order.
    pub fn all(&self) -> Vec<&Snippet> {
        let mut snippets: Vec<&Snippet> = self.snippets.values().collect();
        snippets.sort_by_key(|snippet| snippet.sequence_index);
        snippets
    }

    /// All snippet names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.all()
            .into_iter()
            .map(|snippet| snippet.name.as_str())
            .collect()
    }

    /// Snippets whose queries read directly from `name`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `Error::SnippetNotFound` if no snippet has this name.
    pub fn direct_dependents_of(&self, name: &str) -> Result<Vec<String>> {
        self.get(name)?;
        Ok(self.graph.direct_dependents(name))
    }

    /// Every snippet that depends on `name`, directly or not, deepest first.
    ///
    /// Each dependent is listed before the snippets it depends on; `name`
    /// itself is not included.
    ///
    /// # Errors
    ///
    /// Returns `Error::SnippetNotFound` if no snippet has this name.
    pub fn transitive_dependents_of(&self, name: &str) -> Result<Vec<String>> {
        self.get(name)?;
        Ok(self.graph.transitive_dependents(name))
    }

    /// Registered snippets `name` reads from directly, in insertion order.
    ///
    /// Dependencies that were force-deleted are omitted; the snippet's
    /// `direct_dependencies` still records them.
    ///
    /// # Errors
    ///
    /// Returns `Error::SnippetNotFound` if no snippet has this name.
    pub fn direct_dependencies_of(&self, name: &str) -> Result<Vec<String>> {
        self.get(name)?;
        Ok(self
            .graph
            .direct_dependencies(name)
            .into_iter()
            .filter(|dep| self.snippets.contains_key(dep))
            .collect())
    }

    /// Unconditionally remove a snippet.
    ///
    /// Other snippets' `direct_dependencies` are left untouched.
    pub(crate) fn remove(&mut self, name: &str) -> Option<Snippet> {
        let removed = self.snippets.remove(name)?;
        self.graph.remove(name);
        tracing::debug!(snippet = name, "Removed snippet");
        Some(removed)
    }
}
