//! # Lexical helpers
//!
//! MelodyScript is checked line by line, without building a token stream for
//! the whole document. This module provides the three primitives every check
//! shares:
//! - [`strip_comments`] removes `\_ ... _/` block comments from one line
//! - [`tokens`] splits a line into whitespace-delimited words
//! - [`find_column`] recovers where a word first appears in a line
//!
//! Comments are stripped per line. A comment opened on one line and closed on
//! a later one is not recognised: both halves stay in the text.
//!
//! Columns are counted in `char`s from the start of the line.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\_.*?_/").expect("block comment pattern is valid"));

/// Remove every `\_ ... _/` span from a line.
///
/// Removal repeats until nothing matches, so a comment assembled from the
/// leftovers of another (`\\_ a _/_ b _/`) goes too and stripping twice is
/// the same as stripping once.
pub fn strip_comments(line: &str) -> Cow<'_, str> {
    let mut stripped = BLOCK_COMMENT.replace_all(line, "");
    while BLOCK_COMMENT.is_match(&stripped) {
        stripped = Cow::Owned(BLOCK_COMMENT.replace_all(&stripped, "").into_owned());
    }
    stripped
}

/// Whitespace-delimited words of a line, in order.
pub fn tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Column of the first occurrence of `needle` in `line`.
pub fn find_column(line: &str, needle: &str) -> Option<usize> {
    line.find(needle).map(|byte| line[..byte].chars().count())
}

/// Length of `text` in columns.
pub fn width(text: &str) -> usize {
    text.chars().count()
}
