pub mod checks;
pub mod config;
pub mod debounce;
pub mod diagnostic;
pub mod document;
pub mod error;
pub mod external;
pub mod keywords;
pub mod lexer;
pub mod session;
pub mod validate;

pub use config::Config;
pub use diagnostic::{Diagnostic, Position, Range, Severity};
pub use document::{DiagnosticCollection, DiagnosticPublisher, Document, DocumentProvider, DocumentStore};
pub use error::*;
pub use session::LintSession;
pub use validate::{revalidate, validate_document, validate_text};

/// Lint a MelodyScript source string and return the diagnostics as JSON.
/// This is the main entry point for hosts that only speak JSON.
pub fn lint(source: &str) -> String {
    serde_json::to_string(&validate_text(source)).unwrap_or_else(|_| "[]".to_string())
}

/// Whether any diagnostic in `diagnostics` is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}
