//! Query composition: turn a snippet into a standalone query.
//!
//! A snippet that reads from other snippets cannot be executed on its own. Its
//! dependencies are prepended as common table expressions, each one before the
//! snippets that use it:
//!
//! ```text
//! WITH high_price AS (SELECT * FROM stock WHERE price >= 1.50)
//! SELECT * FROM high_price WHERE symbol = 'a'
//! ```

use super::SnippetStore;
use crate::error::{Error, Result};

impl SnippetStore {
    /// Render `name` with all of its dependencies inlined as CTEs.
    ///
    /// A snippet without dependencies renders as its query text unchanged.
    ///
    /// # Errors
    ///
    /// - `Error::SnippetNotFound` if no snippet has this name
    /// - `Error::DanglingReference` if a dependency on the way was force-deleted
    pub fn render(&self, name: &str) -> Result<String> {
        let snippet = self.get(name)?;
        let dependencies = self.graph.transitive_dependencies(name);

        if dependencies.is_empty() {
            return Ok(snippet.query_text.clone());
        }

        let mut ctes = Vec::with_capacity(dependencies.len());
        for dep in &dependencies {
            let Some(dependency) = self.snippets.get(dep) else {
                // Find which snippet still points at the missing one.
                let user = self
                    .graph
                    .direct_dependents(dep)
                    .into_iter()
                    .find(|user| user == name || dependencies.contains(user))
                    .unwrap_or_else(|| name.to_string());
                return Err(Error::DanglingReference {
                    name: user,
                    missing: dep.clone(),
                });
            };
            ctes.push(format!(
                "{} AS ({})",
                cte_name(dep),
                cte_body(&dependency.query_text)
            ));
        }

        Ok(format!("WITH {}\n{}", ctes.join(", "), snippet.query_text.trim()))
    }
}

/// Quote names that are not plain identifiers.
fn cte_name(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

fn cte_body(query_text: &str) -> &str {
    query_text.trim().trim_end_matches(';').trim_end()
}
