//! # Documents and publication
//!
//! The host side of the linter:
//! - [`Document`] - a URI, a language id and the current text
//! - [`DocumentProvider`] - read-only access to document text by URI
//! - [`DiagnosticPublisher`] - the single output boundary of a validation pass
//! - [`DiagnosticCollection`] - in-memory publisher; each publish replaces the
//!   whole set for that URI
//! - [`DocumentStore`] - in-memory provider for open documents

use crate::diagnostic::Diagnostic;
use crate::error::LintError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Language id of MelodyScript documents.
pub const LANGUAGE_ID: &str = "melodyscript";

/// File extension of MelodyScript sources.
pub const EXTENSION: &str = "mscr";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub uri: String,
    pub language_id: String,
    pub text: String,
}

impl Document {
    pub fn new(uri: impl Into<String>, language_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            text: text.into(),
        }
    }

    /// A MelodyScript document held in memory.
    pub fn melodyscript(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(uri, LANGUAGE_ID, text)
    }

    /// Read a document from disk. The language id follows the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LintError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LintError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let language_id = match path.extension().and_then(|e| e.to_str()) {
            Some(EXTENSION) => LANGUAGE_ID.to_string(),
            Some(other) => other.to_string(),
            None => "plaintext".to_string(),
        };
        Ok(Self::new(path.display().to_string(), language_id, text))
    }

    pub fn is_melodyscript(&self) -> bool {
        self.language_id == LANGUAGE_ID
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

/// Read-only access to document text.
pub trait DocumentProvider {
    fn text(&self, uri: &str) -> Option<&str>;

    fn line_count(&self, uri: &str) -> Option<usize> {
        self.text(uri).map(|text| text.split('\n').count())
    }

    fn line(&self, uri: &str, index: usize) -> Option<&str> {
        self.text(uri)?.split('\n').nth(index)
    }
}

/// Sink for the diagnostics of a validation pass.
pub trait DiagnosticPublisher {
    /// Replace everything previously published for `uri`.
    fn publish(&mut self, uri: &str, diagnostics: Vec<Diagnostic>);
}

#[derive(Debug, Default)]
pub struct DiagnosticCollection {
    entries: HashMap<String, Vec<Diagnostic>>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, uri: &str) -> &[Diagnostic] {
        self.entries.get(uri).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl DiagnosticPublisher for DiagnosticCollection {
    fn publish(&mut self, uri: &str, diagnostics: Vec<Diagnostic>) {
        self.entries.insert(uri.to_string(), diagnostics);
    }
}

#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<String, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document, keyed by its URI.
    pub fn upsert(&mut self, document: Document) {
        self.documents.insert(document.uri.clone(), document);
    }

    pub fn get(&self, uri: &str) -> Option<&Document> {
        self.documents.get(uri)
    }
}

impl DocumentProvider for DocumentStore {
    fn text(&self, uri: &str) -> Option<&str> {
        self.documents.get(uri).map(|d| d.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;
    use std::io::Write;

    #[test]
    fn test_publish_replaces_previous_set() {
        let mut collection = DiagnosticCollection::new();
        collection.publish(
            "a.mscr",
            vec![
                Diagnostic::on_line(0, 0, 1, "one", Severity::Error),
                Diagnostic::on_line(1, 0, 1, "two", Severity::Warning),
            ],
        );
        collection.publish("a.mscr", vec![Diagnostic::on_line(3, 0, 1, "three", Severity::Error)]);
        assert_eq!(collection.get("a.mscr").len(), 1);
        assert_eq!(collection.get("a.mscr")[0].message, "three");

        collection.publish("a.mscr", Vec::new());
        assert!(collection.get("a.mscr").is_empty());
    }

    #[test]
    fn test_publish_is_per_uri() {
        let mut collection = DiagnosticCollection::new();
        collection.publish("a.mscr", vec![Diagnostic::on_line(0, 0, 1, "a", Severity::Error)]);
        collection.publish("b.mscr", Vec::new());
        assert_eq!(collection.get("a.mscr").len(), 1);
        assert!(collection.get("b.mscr").is_empty());
        assert!(collection.get("c.mscr").is_empty());
    }

    #[test]
    fn test_store_provides_lines() {
        let mut store = DocumentStore::new();
        store.upsert(Document::melodyscript("s.mscr", "tempo 120;\ntocar do minima;\n"));
        assert_eq!(store.line_count("s.mscr"), Some(3));
        assert_eq!(store.line("s.mscr", 1), Some("tocar do minima;"));
        assert_eq!(store.line("s.mscr", 7), None);
        assert_eq!(store.text("other.mscr"), None);
    }

    #[test]
    fn test_from_path_sets_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mscr");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "tocar do minima;").unwrap();

        let doc = Document::from_path(&path).unwrap();
        assert!(doc.is_melodyscript());
        assert_eq!(doc.lines().next(), Some("tocar do minima;"));

        let other = dir.path().join("notes.txt");
        fs::write(&other, "x").unwrap();
        assert_eq!(Document::from_path(&other).unwrap().language_id, "txt");
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Document::from_path("/nonexistent/song.mscr").unwrap_err();
        assert!(matches!(err, LintError::Io { .. }));
    }
}
