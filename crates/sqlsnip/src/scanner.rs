//! Detection of snippet references inside query text.
//!
//! The store does not understand SQL. When a snippet is saved it asks a
//! [`ReferenceScanner`] which of the currently known snippet names the query
//! uses as a table. [`SqlReferenceScanner`] is the default implementation; any
//! closure with the matching signature can be plugged in instead.
//!
//! # Recognised references
//!
//! A table reference is an unqualified identifier that follows `FROM` or
//! `JOIN` (including every item of a comma-separated `FROM` list). Qualified
//! names such as `schema.table` and table functions such as `series(1, 5)` are
//! real database objects and never match a snippet. String literals and
//! comments are skipped.
//!
//! Quoted identifiers (`"name"`, `` `name` ``, `[name]`) are unquoted and
//! compared exactly. Unquoted identifiers follow the configured
//! [`IdentifierCase`].

use serde::{Deserialize, Serialize};
use std::iter::Peekable;
use std::str::Chars;

/// Finds which known snippet names a query references as tables.
pub trait ReferenceScanner: Send + Sync {
    /// Return the subset of `known` that `query_text` references as tables.
    ///
    /// Results use the spelling from `known`, are deduplicated and keep the
    /// order of first reference.
    fn scan(&self, query_text: &str, known: &[&str]) -> Vec<String>;
}

impl<F> ReferenceScanner for F
where
    F: Fn(&str, &[&str]) -> Vec<String> + Send + Sync,
{
    fn scan(&self, query_text: &str, known: &[&str]) -> Vec<String> {
        self(query_text, known)
    }
}

/// How unquoted identifiers are compared with snippet names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentifierCase {
    /// Identifiers must match snippet names exactly
    #[default]
    Sensitive,

    /// Unquoted identifiers match snippet names ignoring ASCII case
    Insensitive,
}

/// Keywords that end a table reference instead of naming an alias.
const CLAUSE_KEYWORDS: &[&str] = &[
    "as", "cross", "except", "fetch", "from", "full", "group", "having", "inner", "intersect",
    "into", "join", "lateral", "left", "limit", "natural", "offset", "on", "order", "outer",
    "qualify", "returning", "right", "select", "set", "union", "using", "values", "where",
    "window",
];

/// Default scanner for SQL query text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SqlReferenceScanner {
    case: IdentifierCase,
}

impl SqlReferenceScanner {
    /// Create a scanner with the given identifier case rule.
    pub fn new(case: IdentifierCase) -> Self {
        Self { case }
    }

    /// The identifier case rule in use.
    pub fn case(&self) -> IdentifierCase {
        self.case
    }

    /// Every unqualified table reference in `query_text`, in order of appearance.
    pub fn table_references(query_text: &str) -> Vec<Identifier> {
        let tokens = tokenize(query_text);
        let mut references = Vec::new();
        let mut pos = 0;

        while pos < tokens.len() {
            let starts_table_list = match &tokens[pos] {
                Token::Word(word) => {
                    word.eq_ignore_ascii_case("from") || word.eq_ignore_ascii_case("join")
                }
                _ => false,
            };
            pos += 1;
            if starts_table_list {
                pos = read_table_list(&tokens, pos, &mut references);
            }
        }

        references
    }

    fn matches(&self, identifier: &Identifier, name: &str) -> bool {
        if identifier.quoted || self.case == IdentifierCase::Sensitive {
            identifier.text == name
        } else {
            identifier.text.eq_ignore_ascii_case(name)
        }
    }
}

impl ReferenceScanner for SqlReferenceScanner {
    fn scan(&self, query_text: &str, known: &[&str]) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();

        for identifier in Self::table_references(query_text) {
            // An exact spelling wins over a case-insensitive one.
            let matched = known
                .iter()
                .find(|name| identifier.text == **name)
                .or_else(|| known.iter().find(|name| self.matches(&identifier, name)));

            if let Some(name) = matched {
                if !found.iter().any(|existing| existing == name) {
                    found.push((*name).to_string());
                }
            }
        }

        found
    }
}

/// An identifier as written in the query, with quoting removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// The identifier text without quotes
    pub text: String,
    /// Whether the identifier was quoted
    pub quoted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Quoted(String),
    Dot,
    Comma,
    LParen,
    RParen,
    Other,
}

/// Parse the items of a `FROM`/`JOIN` list starting at `pos`.
///
/// Returns the position of the first token not consumed. Tokens of derived
/// tables are left for the caller, which keeps scanning inside them.
fn read_table_list(tokens: &[Token], mut pos: usize, references: &mut Vec<Identifier>) -> usize {
    loop {
        let Some(first) = identifier_at(tokens, pos) else {
            return pos;
        };
        pos += 1;

        let mut qualified = false;
        while tokens.get(pos) == Some(&Token::Dot) && identifier_at(tokens, pos + 1).is_some() {
            qualified = true;
            pos += 2;
        }

        // Table function call, not a table.
        if tokens.get(pos) == Some(&Token::LParen) {
            return pos;
        }

        if !qualified {
            references.push(first);
        }

        pos = skip_alias(tokens, pos);

        if tokens.get(pos) == Some(&Token::Comma) {
            pos += 1;
        } else {
            return pos;
        }
    }
}

fn skip_alias(tokens: &[Token], pos: usize) -> usize {
    match tokens.get(pos) {
        Some(Token::Word(word)) if word.eq_ignore_ascii_case("as") => {
            if identifier_at(tokens, pos + 1).is_some() {
                pos + 2
            } else {
                pos + 1
            }
        }
        Some(Token::Word(word)) if !is_clause_keyword(word) => pos + 1,
        Some(Token::Quoted(_)) => pos + 1,
        _ => pos,
    }
}

fn identifier_at(tokens: &[Token], pos: usize) -> Option<Identifier> {
    match tokens.get(pos)? {
        Token::Word(word) if !is_clause_keyword(word) => Some(Identifier {
            text: word.clone(),
            quoted: false,
        }),
        Token::Quoted(text) => Some(Identifier {
            text: text.clone(),
            quoted: true,
        }),
        _ => None,
    }
}

fn is_clause_keyword(word: &str) -> bool {
    CLAUSE_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(word))
}

fn tokenize(query_text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = query_text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '-' if chars.peek() == Some(&'-') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for next in chars.by_ref() {
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
            }
            '\'' => {
                read_delimited(&mut chars, '\'');
                tokens.push(Token::Other);
            }
            '"' => tokens.push(Token::Quoted(read_delimited(&mut chars, '"'))),
            '`' => tokens.push(Token::Quoted(read_delimited(&mut chars, '`'))),
            '[' => tokens.push(Token::Quoted(read_delimited(&mut chars, ']'))),
            '.' => tokens.push(Token::Dot),
            ',' => tokens.push(Token::Comma),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            c if c.is_alphabetic() || c == '_' => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_alphanumeric() || next == '_' || next == '$' {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Word(word));
            }
            c if c.is_ascii_digit() => {
                while chars
                    .peek()
                    .is_some_and(|next| next.is_ascii_alphanumeric() || *next == '_')
                {
                    chars.next();
                }
                tokens.push(Token::Other);
            }
            _ => tokens.push(Token::Other),
        }
    }

    tokens
}

/// Read up to the closing delimiter; a doubled delimiter is an escaped one.
fn read_delimited(chars: &mut Peekable<Chars<'_>>, close: char) -> String {
    let mut text = String::new();
    while let Some(c) = chars.next() {
        if c == close {
            if chars.peek() == Some(&close) {
                chars.next();
                text.push(close);
            } else {
                break;
            }
        } else {
            text.push(c);
        }
    }
    text
}
