//! # Static Checks
//!
//! The line-level and document-level rules of the linter.
//!
//! ## Sub-modules
//! - `typo` - misspelled keywords, with the intended spelling
//! - `terminator` - statements missing their closing `;`
//! - `grammar` - argument shape of `tocar`, `pausa` and `forma_onda`
//! - `balance` - `{}`, `()` and chord `<>` totals over the whole document
//!
//! Line checks receive a [`LineContext`] and append to a shared list, so the
//! output order is the order in which the orchestrator runs them: typos,
//! terminators, grammar, line after line, then balance.
//!
//! ## Related Modules
//! - `lexer` - comment stripping and tokenizing
//! - `keywords` - the tables these rules consult
//! - `validate` - runs the checks over a document

pub mod balance;
pub mod grammar;
pub mod terminator;
pub mod typo;

use crate::lexer::{find_column, width};

/// One line of a document, in the forms the checks need.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    /// Zero-based line number.
    pub index: usize,
    /// The line as it appears in the document.
    pub original: &'a str,
    /// The line with block comments removed.
    pub stripped: &'a str,
    /// `stripped` without surrounding whitespace.
    pub trimmed: &'a str,
    /// Whether the line sits inside a `funcao` body.
    pub in_function: bool,
}

impl<'a> LineContext<'a> {
    pub fn new(index: usize, original: &'a str, stripped: &'a str) -> Self {
        Self {
            index,
            original,
            stripped,
            trimmed: stripped.trim(),
            in_function: false,
        }
    }

    pub fn in_function(mut self, in_function: bool) -> Self {
        self.in_function = in_function;
        self
    }

    /// Column range of `token` for reporting.
    ///
    /// Searched in the original line first so columns match what the user
    /// sees. A token glued together by comment removal (`mi\_ x _/nima`) only
    /// exists in the stripped text; failing both, the whole line is used.
    pub fn token_range(&self, token: &str) -> (usize, usize) {
        find_column(self.original, token)
            .or_else(|| find_column(self.stripped, token))
            .map(|start| (start, start + width(token)))
            .unwrap_or((0, width(self.original)))
    }

    /// Column range of the trimmed statement, starting at column 0.
    pub fn statement_range(&self) -> (usize, usize) {
        (0, width(self.trimmed))
    }
}
