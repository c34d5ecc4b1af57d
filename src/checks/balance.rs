//! Delimiter balance over the whole document.
//!
//! Braces, parentheses and chord brackets are totalled across every line
//! (comments stripped) and each unbalanced kind yields exactly one Error at
//! the document anchor.
//!
//! `<` and `>` double as comparison and arrow operators, so chord brackets are
//! counted with exclusions:
//! - `<` opens a chord unless followed by `=` or `>` (`<=`, `<>`)
//! - `>` closes a chord unless preceded by `<`, `=`, `>` or `-` (`<>`, `=>`,
//!   `>>`, `->`)
//!
//! This is not a tokenizer: `>=` and the first `>` of `>>` still count as
//! chord closes.

use crate::diagnostic::{Diagnostic, Severity};
use crate::lexer::strip_comments;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub open: usize,
    pub close: usize,
}

/// Delimiter totals for a document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterCounts {
    pub braces: Tally,
    pub parens: Tally,
    pub chords: Tally,
}

impl DelimiterCounts {
    /// Add the delimiters of one comment-stripped line.
    pub fn add_line(&mut self, line: &str) {
        let chars: Vec<char> = line.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            match c {
                '{' => self.braces.open += 1,
                '}' => self.braces.close += 1,
                '(' => self.parens.open += 1,
                ')' => self.parens.close += 1,
                '<' if !matches!(chars.get(i + 1), Some('=' | '>')) => self.chords.open += 1,
                '>' if !(i > 0 && matches!(chars[i - 1], '<' | '=' | '>' | '-')) => {
                    self.chords.close += 1
                }
                _ => {}
            }
        }
    }

    pub fn of_text(text: &str) -> Self {
        let mut counts = Self::default();
        for line in text.split('\n') {
            counts.add_line(&strip_comments(line));
        }
        counts
    }
}

struct Delimiter {
    tally: Tally,
    singular: &'static str,
    plural: &'static str,
    symbol: char,
}

impl Delimiter {
    fn noun(&self, n: usize) -> &'static str {
        if n == 1 {
            self.singular
        } else {
            self.plural
        }
    }

    fn diagnostic(&self) -> Option<Diagnostic> {
        let Tally { open, close } = self.tally;
        let message = if open > close {
            let n = open - close;
            format!("missing {} {} '{}'", n, self.noun(n), self.symbol)
        } else if close > open {
            let n = close - open;
            format!("{} extra {} '{}'", n, self.noun(n), self.symbol)
        } else {
            return None;
        };
        Some(Diagnostic::document(message, Severity::Error))
    }
}

/// Check the delimiter balance of a whole document.
pub fn check(text: &str) -> Vec<Diagnostic> {
    let counts = DelimiterCounts::of_text(text);
    [
        Delimiter {
            tally: counts.braces,
            singular: "closing brace",
            plural: "closing braces",
            symbol: '}',
        },
        Delimiter {
            tally: counts.parens,
            singular: "closing parenthesis",
            plural: "closing parentheses",
            symbol: ')',
        },
        Delimiter {
            tally: counts.chords,
            singular: "chord closing bracket",
            plural: "chord closing brackets",
            symbol: '>',
        },
    ]
    .iter()
    .filter_map(Delimiter::diagnostic)
    .collect()
}
