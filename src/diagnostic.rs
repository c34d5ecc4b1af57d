//! # Diagnostics
//!
//! A [`Diagnostic`] is a positioned, severity-tagged message about a document.
//! Every diagnostic the crate builds goes through [`Diagnostic::new`], which
//! stamps the [`SOURCE`] tag so editors can group them.
//!
//! Positions are zero-based. `end` is exclusive, as editors expect.

use serde::Serialize;
use std::fmt;

/// Source tag carried by every diagnostic.
pub const SOURCE: &str = "MelodyScript";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Structural or grammar violation.
    Error,
    /// Likely mistake; the text may still be what the author meant.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// The `(0,0)-(0,1)` range used for findings about the document as a whole.
    pub const DOCUMENT: Range = Range {
        start: Position { line: 0, column: 0 },
        end: Position { line: 0, column: 1 },
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub message: String,
    pub severity: Severity,
    pub source: &'static str,
}

impl Diagnostic {
    /// Build a diagnostic. Ranges are taken as given.
    pub fn new(
        start_line: usize,
        start_column: usize,
        end_line: usize,
        end_column: usize,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            range: Range {
                start: Position {
                    line: start_line,
                    column: start_column,
                },
                end: Position {
                    line: end_line,
                    column: end_column,
                },
            },
            message: message.into(),
            severity,
            source: SOURCE,
        }
    }

    /// Diagnostic spanning `start..end` columns of a single line.
    pub fn on_line(
        line: usize,
        start: usize,
        end: usize,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self::new(line, start, line, end, message, severity)
    }

    /// Diagnostic about the document as a whole, anchored at [`Range::DOCUMENT`].
    pub fn document(message: impl Into<String>, severity: Severity) -> Self {
        let Range { start, end } = Range::DOCUMENT;
        Self::new(start.line, start.column, end.line, end.column, message, severity)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.range.start.line + 1,
            self.range.start.column + 1,
            self.severity,
            self.message
        )
    }
}
