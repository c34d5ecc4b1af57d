//! # Validation Orchestrator
//!
//! Runs every static check over a document and produces its complete
//! diagnostic set in one pass.
//!
//! ## Pipeline
//! For each line:
//! 1. Strip block comments (`lexer`)
//! 2. Skip the line if nothing is left
//! 3. Typos, missing terminators, command arguments (`checks`)
//!
//! Then once for the whole text:
//! 4. Delimiter balance (`checks::balance`)
//!
//! A pass reads nothing but the text it is given, so validating the same text
//! twice yields the same diagnostics.
//!
//! ## Example
//! ```rust
//! use melodylint::validate_text;
//!
//! let diagnostics = validate_text("tocar do minima;\npausa xyz2;");
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].range.start.line, 1);
//! ```

use crate::checks::{balance, grammar, terminator, typo, LineContext};
use crate::diagnostic::Diagnostic;
use crate::document::{DiagnosticPublisher, Document, DocumentProvider};
use crate::keywords::FUNCTION;
use crate::lexer::strip_comments;
use tracing::debug;

/// Validate a document's text.
pub fn validate_text(text: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut scope = FunctionScope::default();

    for (index, original) in text.split('\n').enumerate() {
        let stripped = strip_comments(original);
        let line = LineContext::new(index, original, &stripped).in_function(scope.inside());
        scope.advance(line.trimmed);
        if line.trimmed.is_empty() {
            continue;
        }

        typo::check(&line, &mut diagnostics);
        terminator::check(&line, &mut diagnostics);
        grammar::check(&line, &mut diagnostics);
    }

    diagnostics.extend(balance::check(text));
    diagnostics
}

pub fn validate_document(document: &Document) -> Vec<Diagnostic> {
    validate_text(&document.text)
}

/// Validate `uri` and publish the result, replacing the previous set.
///
/// Returns the number of diagnostics published, or `None` when the provider
/// does not know the document.
pub fn revalidate<P, D>(provider: &P, uri: &str, publisher: &mut D) -> Option<usize>
where
    P: DocumentProvider + ?Sized,
    D: DiagnosticPublisher + ?Sized,
{
    let text = provider.text(uri)?;
    let diagnostics = validate_text(text);
    let count = diagnostics.len();
    debug!(uri, count, "static validation pass");
    publisher.publish(uri, diagnostics);
    Some(count)
}

/// Tracks whether lines are inside a `funcao` body, by brace depth.
///
/// The body opens at the first `{` on the header line or on the line right
/// after it, and closes with the matching `}`.
#[derive(Debug, Default)]
struct FunctionScope {
    depth: usize,
    bodies: Vec<usize>,
    awaiting_body: bool,
}

impl FunctionScope {
    fn inside(&self) -> bool {
        !self.bodies.is_empty()
    }

    fn advance(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        let header = line.split_whitespace().next() == Some(FUNCTION);
        let mut awaiting = self.awaiting_body || header;

        for c in line.chars() {
            match c {
                '{' => {
                    self.depth += 1;
                    if awaiting {
                        self.bodies.push(self.depth);
                        awaiting = false;
                    }
                }
                '}' => {
                    if self.bodies.last() == Some(&self.depth) {
                        self.bodies.pop();
                    }
                    self.depth = self.depth.saturating_sub(1);
                }
                _ => {}
            }
        }

        self.awaiting_body = header && awaiting;
    }
}
