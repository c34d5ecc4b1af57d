//! # Error Types
//!
//! Problems found *in* a MelodyScript document are never errors: they are
//! [`Diagnostic`](crate::Diagnostic)s. [`LintError`] covers the failures
//! around the engine instead: reading files, loading configuration, and the
//! host-side preconditions of the editor actions (an active document, the
//! right language, a resolvable workspace, the collaborator scripts).
//!
//! Each of these aborts only the action that triggered it and is shown to the
//! user once as a notice.
//!
//! ## Usage
//! ```rust
//! use melodylint::{Config, LintError};
//!
//! match Config::load("missing.yaml") {
//!     Err(LintError::Io { path, .. }) => eprintln!("cannot read {}", path.display()),
//!     Err(e) => eprintln!("{}", e),
//!     Ok(_) => {}
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LintError {
    /// A file could not be read.
    ///
    /// ```
    /// # use melodylint::LintError;
    /// let err = LintError::Io {
    ///     path: "song.mscr".into(),
    ///     source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
    /// };
    /// assert_eq!(err.to_string(), "Cannot read 'song.mscr': not found");
    /// ```
    #[error("Cannot read '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`Config`](crate::Config).
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No active editor found")]
    NoActiveDocument,

    /// The active document is not a MelodyScript document.
    ///
    /// ```
    /// # use melodylint::LintError;
    /// let err = LintError::WrongLanguage("rust".to_string());
    /// assert_eq!(err.to_string(), "The current file is not a MelodyScript file (language: rust)");
    /// ```
    #[error("The current file is not a MelodyScript file (language: {0})")]
    WrongLanguage(String),

    /// No workspace folder contains the file.
    #[error("Could not determine the workspace folder for '{}'", .0.display())]
    WorkspaceUnresolved(PathBuf),

    /// A collaborator script or module is missing from the workspace.
    #[error("Script not found: '{}'", .0.display())]
    ScriptNotFound(PathBuf),

    /// A collaborator process could not be started.
    #[error("Failed to start '{}': {}", .program, .source)]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}
