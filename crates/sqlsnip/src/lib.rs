//! sqlsnip - named SQL snippets that reference each other as virtual tables.
//!
//! The heart of the crate is [`store::SnippetStore`], an in-memory catalog that
//! records which snippets reference which others, refuses unsafe deletions and
//! performs cascading deletion in dependents-first order. On top of it sit a
//! notebook-style command layer ([`session`]) and the `sqlsnip` binary.

#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;
pub mod format;
pub mod scanner;
pub mod session;
pub mod store;

// Public CLI module (needed by binary)
pub mod cli;

// Output formatting shared by CLI commands
pub mod output;
