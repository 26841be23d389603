//! Deletion policies.
//!
//! | Mode      | Dependents present         | Removes                         |
//! |-----------|----------------------------|---------------------------------|
//! | `Safe`    | refuses (`DependentsExist`) | the target                      |
//! | `Force`   | left dangling, reported     | the target                      |
//! | `Cascade` | removed, deepest first      | every transitive dependent, then the target |
//!
//! Every mode checks that the target exists before looking at dependents, and
//! nothing is removed unless the whole operation can succeed.

use super::SnippetStore;
use crate::domain::{DeleteMode, Deletion};
use crate::error::{Error, Result};

impl SnippetStore {
    /// Delete `name` using the given policy.
    ///
    /// # Errors
    ///
    /// See [`safe_delete`](Self::safe_delete), [`force_delete`](Self::force_delete)
    /// and [`force_delete_all`](Self::force_delete_all).
    pub fn delete(&mut self, name: &str, mode: DeleteMode) -> Result<Deletion> {
        match mode {
            DeleteMode::Safe => self.safe_delete(name),
            DeleteMode::Force => self.force_delete(name),
            DeleteMode::Cascade => self.force_delete_all(name),
        }
    }

    /// Delete `name` only if no other snippet depends on it.
    ///
    /// # Errors
    ///
    /// - `Error::SnippetNotFound` if no snippet has this name
    /// - `Error::DependentsExist` if other snippets read from it; the error
    ///   lists the direct dependents and what a cascading delete would remove
    pub fn safe_delete(&mut self, name: &str) -> Result<Deletion> {
        let dependents = self.direct_dependents_of(name)?;

        if !dependents.is_empty() {
            let mut cascade = self.graph.transitive_dependents(name);
            cascade.push(name.to_string());
            return Err(Error::DependentsExist {
                name: name.to_string(),
                dependents,
                cascade,
            });
        }

        self.remove(name);

        Ok(Deletion {
            target: name.to_string(),
            mode: DeleteMode::Safe,
            removed: vec![name.to_string()],
            dangling_dependents: Vec::new(),
        })
    }

    /// Delete `name` regardless of dependents.
    ///
    /// Dependents stay registered and keep referencing `name`; they are
    /// reported in `dangling_dependents`.
    ///
    /// # Errors
    ///
    /// Returns `Error::SnippetNotFound` if no snippet has this name.
    pub fn force_delete(&mut self, name: &str) -> Result<Deletion> {
        let dangling_dependents = self.direct_dependents_of(name)?;

        self.remove(name);

        if !dangling_dependents.is_empty() {
            tracing::warn!(
                snippet = name,
                dependents = ?dangling_dependents,
                "Force-deleted snippet still referenced by other snippets"
            );
        }

        Ok(Deletion {
            target: name.to_string(),
            mode: DeleteMode::Force,
            removed: vec![name.to_string()],
            dangling_dependents,
        })
    }

    /// Delete `name` together with everything that depends on it.
    ///
    /// Dependents are removed deepest first, so `removed` lists every
    /// dependent before the snippets it reads from and ends with `name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::SnippetNotFound` if no snippet has this name.
    pub fn force_delete_all(&mut self, name: &str) -> Result<Deletion> {
        let mut removed = self.transitive_dependents_of(name)?;
        removed.push(name.to_string());

        for victim in &removed {
            self.remove(victim);
        }

        tracing::info!(snippet = name, removed = ?removed, "Cascade-deleted snippet");

        Ok(Deletion {
            target: name.to_string(),
            mode: DeleteMode::Cascade,
            removed,
            dangling_dependents: Vec::new(),
        })
    }
}
