//! # External Processes
//!
//! Two collaborators live in the user's workspace and are only ever started
//! from here:
//! - the **deep validator**, a Python module run on save whose report is
//!   read back with [`parse_validator_output`]
//! - the **interpreter**, a `run_melodyscript` script launched on request
//!
//! ## Report protocol
//! The validator writes one finding per line:
//!
//! ```text
//!   - Linha 12: Erro: nota desconhecida
//!   - Linha 14: parametro nao usado
//! Erro: arquivo vazio
//! ```
//!
//! A `Linha N:` finding covers the whole of line N; it is an Error when the
//! output line mentions the error word and a Warning otherwise. A line
//! starting with `Erro:` is a document-wide Error. Both words are
//! configurable through [`Protocol`].

use crate::config::ValidatorConfig;
use crate::diagnostic::{Diagnostic, Range, Severity};
use crate::error::LintError;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::{debug, info};

/// End column used for findings that cover a whole line.
pub const WHOLE_LINE_END: usize = 1000;

/// Marker words of the validator's report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protocol {
    pub line_word: String,
    pub error_word: String,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            line_word: "Linha".to_string(),
            error_word: "Erro".to_string(),
        }
    }
}

impl Protocol {
    fn line_pattern(&self) -> Result<Regex, LintError> {
        Regex::new(&format!(r"{}\s+(\d+):\s+(.+)", regex::escape(&self.line_word)))
            .map_err(|e| LintError::Config(e.to_string()))
    }

    fn global_prefix(&self) -> String {
        format!("{}:", self.error_word)
    }
}

/// Turn the validator's report into diagnostics.
///
/// A run that exited successfully with an empty stderr reports nothing, even
/// if it printed.
pub fn parse_validator_output(
    stdout: &str,
    stderr: &str,
    success: bool,
    protocol: &Protocol,
) -> Result<Vec<Diagnostic>, LintError> {
    let mut diagnostics = Vec::new();
    if success && stderr.is_empty() {
        return Ok(diagnostics);
    }

    let line_pattern = protocol.line_pattern()?;
    let global_prefix = protocol.global_prefix();

    for line in stdout.lines() {
        if let Some(caps) = line_pattern.captures(line) {
            let Ok(number) = caps[1].parse::<usize>() else {
                continue;
            };
            let severity = if line.contains(&protocol.error_word) {
                Severity::Error
            } else {
                Severity::Warning
            };
            diagnostics.push(Diagnostic::on_line(
                number.saturating_sub(1),
                0,
                WHOLE_LINE_END,
                &caps[2],
                severity,
            ));
        } else if let Some(rest) = line.strip_prefix(&global_prefix) {
            diagnostics.push(Diagnostic::document(rest.trim(), Severity::Error));
        }
    }

    if !stderr.is_empty() {
        diagnostics.push(Diagnostic::document(
            format!("linter error: {}", stderr.trim_end()),
            Severity::Error,
        ));
    }

    Ok(diagnostics)
}

/// Write diagnostics in the validator's report format.
///
/// Document-wide Errors become `Erro: ...`, everything else `Linha N: ...`
/// with the error word in front of Error messages.
pub fn render_protocol(diagnostics: &[Diagnostic], protocol: &Protocol) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        let line = diagnostic.range.start.line + 1;
        let rendered = if diagnostic.range == Range::DOCUMENT && diagnostic.is_error() {
            format!("{}: {}", protocol.error_word, diagnostic.message)
        } else if diagnostic.is_error() {
            format!(
                "{} {}: {}: {}",
                protocol.line_word, line, protocol.error_word, diagnostic.message
            )
        } else {
            format!("{} {}: {}", protocol.line_word, line, diagnostic.message)
        };
        out.push_str(&rendered);
        out.push('\n');
    }
    out
}

/// The workspace's deep validator, `<python> -m <module> <file>`.
#[derive(Debug, Clone)]
pub struct DeepValidator {
    python: String,
    module: String,
    protocol: Protocol,
}

impl DeepValidator {
    pub fn new(config: &ValidatorConfig) -> Self {
        Self {
            python: config.python.clone(),
            module: config.module.clone(),
            protocol: config.protocol.clone(),
        }
    }

    /// Directory that must exist for the validator to be run.
    pub fn linter_dir(workspace: &Path) -> PathBuf {
        workspace.join("src").join("linter")
    }

    pub fn command(&self, workspace: &Path, file: &Path) -> Command {
        let mut command = Command::new(&self.python);
        command
            .arg("-m")
            .arg(&self.module)
            .arg(file)
            .current_dir(workspace);
        command
    }

    /// Run the validator on `file` and read its report.
    ///
    /// Returns `Ok(None)` when the workspace has no validator.
    pub fn run(&self, workspace: &Path, file: &Path) -> Result<Option<Vec<Diagnostic>>, LintError> {
        let linter_dir = Self::linter_dir(workspace);
        if !linter_dir.is_dir() {
            debug!(path = %linter_dir.display(), "deep validator not found, skipping");
            return Ok(None);
        }

        let output = self
            .command(workspace, file)
            .output()
            .map_err(|source| LintError::Spawn {
                program: self.python.clone(),
                source,
            })?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(
            file = %file.display(),
            status = ?output.status.code(),
            "deep validator finished"
        );

        parse_validator_output(&stdout, &stderr, output.status.success(), &self.protocol).map(Some)
    }
}

/// Path of the interpreter launcher inside a workspace.
pub fn interpreter_script(workspace: &Path, windows: bool) -> PathBuf {
    workspace.join(if windows {
        "run_melodyscript.bat"
    } else {
        "run_melodyscript.sh"
    })
}

/// Build `run_melodyscript executar <relative path>`, run from the workspace root.
pub fn interpreter_command(workspace: &Path, file: &Path, windows: bool) -> Result<Command, LintError> {
    let script = interpreter_script(workspace, windows);
    if !script.is_file() {
        return Err(LintError::ScriptNotFound(script));
    }
    let relative = file
        .strip_prefix(workspace)
        .map_err(|_| LintError::WorkspaceUnresolved(file.to_path_buf()))?;

    let mut command = Command::new(&script);
    command.arg("executar").arg(relative).current_dir(workspace);
    Ok(command)
}

/// Run the interpreter on `file` in the foreground, sharing this terminal.
pub fn launch_interpreter(workspace: &Path, file: &Path) -> Result<ExitStatus, LintError> {
    let mut command = interpreter_command(workspace, file, cfg!(windows))?;
    info!(file = %file.display(), "launching interpreter");
    command.status().map_err(|source| LintError::Spawn {
        program: interpreter_script(workspace, cfg!(windows)).display().to_string(),
        source,
    })
}
