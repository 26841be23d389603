//! Thread-safe handle to a [`SnippetStore`].
//!
//! The dependency invariants only hold if mutations never interleave, so every
//! mutating call holds the write lock for its whole duration. Read-only calls
//! share the read lock and may run alongside each other.

use super::SnippetStore;
use crate::domain::{DeleteMode, Deletion, Snippet};
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Cloneable, shareable store handle.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<SnippetStore>>,
}

impl SharedStore {
    /// Wrap an existing store.
    pub fn new(store: SnippetStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Save a new snippet. See [`SnippetStore::save`].
    ///
    /// # Errors
    ///
    /// Propagates the store's validation errors.
    pub async fn save(&self, name: &str, query_text: &str) -> Result<Snippet> {
        self.inner.write().await.save(name, query_text)
    }

    /// Delete a snippet. See [`SnippetStore::delete`].
    ///
    /// # Errors
    ///
    /// Propagates the store's deletion errors.
    pub async fn delete(&self, name: &str, mode: DeleteMode) -> Result<Deletion> {
        self.inner.write().await.delete(name, mode)
    }

    /// A copy of the named snippet.
    ///
    /// # Errors
    ///
    /// Returns `Error::SnippetNotFound` if no snippet has this name.
    pub async fn get(&self, name: &str) -> Result<Snippet> {
        self.inner.read().await.get(name).cloned()
    }

    /// Copies of all snippets in insertion order.
    pub async fn all(&self) -> Vec<Snippet> {
        self.inner.read().await.all().into_iter().cloned().collect()
    }

    /// All snippet names in insertion order.
    pub async fn names(&self) -> Vec<String> {
        self.inner
            .read()
            .await
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// See [`SnippetStore::direct_dependents_of`].
    ///
    /// # Errors
    ///
    /// Returns `Error::SnippetNotFound` if no snippet has this name.
    pub async fn direct_dependents_of(&self, name: &str) -> Result<Vec<String>> {
        self.inner.read().await.direct_dependents_of(name)
    }

    /// See [`SnippetStore::transitive_dependents_of`].
    ///
    /// # Errors
    ///
    /// Returns `Error::SnippetNotFound` if no snippet has this name.
    pub async fn transitive_dependents_of(&self, name: &str) -> Result<Vec<String>> {
        self.inner.read().await.transitive_dependents_of(name)
    }

    /// See [`SnippetStore::render`].
    ///
    /// # Errors
    ///
    /// Propagates the store's rendering errors.
    pub async fn render(&self, name: &str) -> Result<String> {
        self.inner.read().await.render(name)
    }

    /// Hold the read lock for several queries that must see the same state.
    pub async fn read(&self) -> RwLockReadGuard<'_, SnippetStore> {
        self.inner.read().await
    }
}
