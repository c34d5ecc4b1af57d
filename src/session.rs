//! # Lint Session
//!
//! Editor-facing state of the linter. A [`LintSession`] owns the open
//! documents, the published diagnostics and the edit debouncer, and is the
//! only place diagnostics are written.
//!
//! ## Events
//! - `on_open` - validate immediately
//! - `on_change` - store the text and (re)start the quiet period
//! - `tick` - validate documents whose quiet period elapsed, then apply
//!   finished deep-validator reports
//! - `on_save` - validate immediately and start the deep validator in the
//!   background
//!
//! Deep-validator runs post a [`DeepReport`] to a channel the session drains
//! on `tick`. A report replaces whatever was published for its document, and
//! a later static pass replaces the report in turn.

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::diagnostic::Diagnostic;
use crate::document::{DiagnosticCollection, DiagnosticPublisher, Document, DocumentStore};
use crate::error::LintError;
use crate::external::{self, DeepValidator};
use crate::validate::revalidate;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Diagnostics produced outside the session for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepReport {
    pub uri: String,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct LintSession {
    config: Config,
    workspace_folders: Vec<PathBuf>,
    documents: DocumentStore,
    diagnostics: DiagnosticCollection,
    debouncer: Debouncer<String>,
    active: Option<String>,
    reports_tx: Sender<DeepReport>,
    reports_rx: Receiver<DeepReport>,
}

impl LintSession {
    pub fn new(config: Config) -> Self {
        let (reports_tx, reports_rx) = mpsc::channel();
        Self {
            debouncer: Debouncer::new(config.debounce),
            config,
            workspace_folders: Vec::new(),
            documents: DocumentStore::new(),
            diagnostics: DiagnosticCollection::new(),
            active: None,
            reports_tx,
            reports_rx,
        }
    }

    pub fn with_workspace(mut self, folder: impl Into<PathBuf>) -> Self {
        self.workspace_folders.push(folder.into());
        self
    }

    pub fn diagnostics(&self, uri: &str) -> &[Diagnostic] {
        self.diagnostics.get(uri)
    }

    pub fn document(&self, uri: &str) -> Option<&Document> {
        self.documents.get(uri)
    }

    /// Whether `document` is handled by this session.
    pub fn accepts(&self, document: &Document) -> bool {
        document.language_id == self.config.language_id
    }

    /// Make `uri` the document editor commands apply to.
    pub fn set_active(&mut self, uri: Option<&str>) {
        self.active = uri.map(str::to_string);
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.active.as_deref().and_then(|uri| self.documents.get(uri))
    }

    /// Sender for reports computed off the session's thread.
    pub fn report_sender(&self) -> Sender<DeepReport> {
        self.reports_tx.clone()
    }

    /// A document was opened or focused and becomes the active one.
    ///
    /// Returns false if it is not validated because of its language.
    pub fn on_open(&mut self, document: Document) -> bool {
        let uri = document.uri.clone();
        let accepted = self.accepts(&document);
        if !accepted {
            debug!(uri = %uri, language = %document.language_id, "not validating document");
        }
        self.documents.upsert(document);
        self.active = Some(uri.clone());
        if accepted {
            self.validate_now(&uri);
        }
        accepted
    }

    /// A document's text changed.
    pub fn on_change(&mut self, document: Document, now: Instant) -> bool {
        if !self.accepts(&document) {
            return false;
        }
        let uri = document.uri.clone();
        self.documents.upsert(document);
        self.debouncer.schedule(uri, now);
        true
    }

    /// Run the passes that are due. Returns how many sets were published.
    pub fn tick(&mut self, now: Instant) -> usize {
        let due = self.debouncer.poll(now);
        let mut published = 0;
        for uri in &due {
            if self.validate_now(uri) {
                published += 1;
            }
        }
        published + self.drain_external()
    }

    /// A document was saved.
    ///
    /// Validates right away and starts the deep validator when the document
    /// lies in a workspace. The handle of the background run is returned so
    /// callers can wait for it.
    pub fn on_save(&mut self, document: Document) -> Option<JoinHandle<()>> {
        if !self.accepts(&document) {
            return None;
        }
        let uri = document.uri.clone();
        self.documents.upsert(document);
        self.debouncer.cancel(&uri);
        self.validate_now(&uri);

        let file = PathBuf::from(&uri);
        let Some(workspace) = self.resolve_workspace(&file) else {
            debug!(uri = %uri, "document outside the workspace, no deep validation");
            return None;
        };

        let validator = DeepValidator::new(&self.config.validator);
        let reports = self.reports_tx.clone();
        Some(thread::spawn(move || {
            match validator.run(&workspace, &file) {
                Ok(Some(diagnostics)) => {
                    // The session may be gone by the time the run finishes.
                    let _ = reports.send(DeepReport { uri, diagnostics });
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "deep validation failed"),
            }
        }))
    }

    /// Publish every report received so far, in arrival order.
    pub fn drain_external(&mut self) -> usize {
        let mut published = 0;
        while let Ok(report) = self.reports_rx.try_recv() {
            info!(uri = %report.uri, count = report.diagnostics.len(), "deep validation report");
            self.diagnostics.publish(&report.uri, report.diagnostics);
            published += 1;
        }
        published
    }

    /// Workspace folder containing `path`, the innermost when folders nest.
    pub fn resolve_workspace(&self, path: &Path) -> Option<PathBuf> {
        self.workspace_folders
            .iter()
            .filter(|folder| path.starts_with(folder))
            .max_by_key(|folder| folder.components().count())
            .cloned()
    }

    /// Run the active document with the workspace's interpreter.
    ///
    /// Checks, in order, that a document is active, that it is a MelodyScript
    /// document and that it lies in a workspace.
    pub fn run_command(&self) -> Result<ExitStatus, LintError> {
        let document = self.active_document().ok_or(LintError::NoActiveDocument)?;
        if !self.accepts(document) {
            return Err(LintError::WrongLanguage(document.language_id.clone()));
        }
        let file = PathBuf::from(&document.uri);
        let workspace = self
            .resolve_workspace(&file)
            .ok_or_else(|| LintError::WorkspaceUnresolved(file.clone()))?;
        external::launch_interpreter(&workspace, &file)
    }

    fn validate_now(&mut self, uri: &str) -> bool {
        match revalidate(&self.documents, uri, &mut self.diagnostics) {
            Some(count) => {
                info!(uri, count, "published diagnostics");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;
    use std::time::Duration;

    fn session() -> LintSession {
        LintSession::new(Config::default())
    }

    #[test]
    fn test_open_validates_immediately() {
        let mut session = session();
        assert!(session.on_open(Document::melodyscript("a.mscr", "tocar do xyz;")));
        assert_eq!(session.diagnostics("a.mscr").len(), 1);
        assert_eq!(session.active_document().map(|d| d.uri.as_str()), Some("a.mscr"));
    }

    #[test]
    fn test_other_languages_are_ignored() {
        let mut session = session();
        assert!(!session.on_open(Document::new("a.rs", "rust", "tocar do xyz;")));
        assert!(!session.on_change(Document::new("a.rs", "rust", "x"), Instant::now()));
        assert!(session.diagnostics("a.rs").is_empty());
        assert_eq!(session.document("a.rs").map(|d| d.text.as_str()), Some("tocar do xyz;"));
    }

    #[test]
    fn test_change_is_debounced() {
        let start = Instant::now();
        let mut session = session();
        session.on_open(Document::melodyscript("a.mscr", "tocar do minima;"));

        session.on_change(Document::melodyscript("a.mscr", "tocar do xyz;"), start);
        session.on_change(
            Document::melodyscript("a.mscr", "forma_onda ruido;\ntocar do xyz;"),
            start + Duration::from_millis(200),
        );
        assert_eq!(session.tick(start + Duration::from_millis(600)), 0);
        assert!(session.diagnostics("a.mscr").is_empty());

        assert_eq!(session.tick(start + Duration::from_millis(700)), 1);
        assert_eq!(session.diagnostics("a.mscr").len(), 2);
    }

    #[test]
    fn test_save_validates_and_cancels_pending_change() {
        let start = Instant::now();
        let mut session = session();
        session.on_change(Document::melodyscript("a.mscr", "pausa longa;"), start);
        assert!(session.on_save(Document::melodyscript("a.mscr", "pausa longa;")).is_none());
        assert_eq!(session.diagnostics("a.mscr").len(), 1);
        assert_eq!(session.tick(start + Duration::from_secs(1)), 0);
    }

    #[test]
    fn test_reports_replace_and_are_replaced() {
        let mut session = session();
        session.on_open(Document::melodyscript("a.mscr", "tocar do xyz;"));

        let sender = session.report_sender();
        sender
            .send(DeepReport {
                uri: "a.mscr".to_string(),
                diagnostics: vec![Diagnostic::on_line(0, 0, 1000, "first", Severity::Warning)],
            })
            .unwrap();
        sender
            .send(DeepReport {
                uri: "a.mscr".to_string(),
                diagnostics: Vec::new(),
            })
            .unwrap();
        assert_eq!(session.drain_external(), 2);
        assert!(session.diagnostics("a.mscr").is_empty());

        session.on_open(Document::melodyscript("a.mscr", "tocar do xyz;"));
        assert_eq!(session.diagnostics("a.mscr").len(), 1);
    }

    #[test]
    fn test_save_without_deep_validator() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.mscr");
        let mut session = session().with_workspace(dir.path());

        let handle = session.on_save(Document::melodyscript(file.display().to_string(), "tempo 120"));
        handle.expect("document is in the workspace").join().unwrap();
        assert_eq!(session.drain_external(), 0);
        assert_eq!(session.diagnostics(&file.display().to_string()).len(), 1);
    }

    #[test]
    fn test_resolve_innermost_workspace() {
        let session = session()
            .with_workspace("/work")
            .with_workspace("/work/songs");
        assert_eq!(
            session.resolve_workspace(Path::new("/work/songs/a.mscr")),
            Some(PathBuf::from("/work/songs"))
        );
        assert_eq!(
            session.resolve_workspace(Path::new("/work/b.mscr")),
            Some(PathBuf::from("/work"))
        );
        assert_eq!(session.resolve_workspace(Path::new("/other/c.mscr")), None);
    }

    #[test]
    fn test_run_command_guards_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();
        assert!(matches!(session.run_command(), Err(LintError::NoActiveDocument)));

        let file = dir.path().join("a.mscr").display().to_string();
        session.on_open(Document::melodyscript(file.clone(), "tempo 120;"));
        assert!(matches!(
            session.run_command(),
            Err(LintError::WorkspaceUnresolved(_))
        ));

        let mut session = session.with_workspace(dir.path());
        assert!(matches!(session.run_command(), Err(LintError::ScriptNotFound(_))));

        session.set_active(Some("missing.mscr"));
        assert!(matches!(session.run_command(), Err(LintError::NoActiveDocument)));
    }

    #[test]
    fn test_run_command_rejects_other_language() {
        let mut session = session().with_workspace("/work");
        session.on_open(Document::new("/work/main.rs", "rust", "fn main() {}"));
        match session.run_command() {
            Err(LintError::WrongLanguage(language)) => assert_eq!(language, "rust"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
