//! Workspace configuration, read from `.melodylint.yaml`.
//!
//! ```yaml
//! debounce-ms: 500
//! language-id: melodyscript
//! validator:
//!   python: python3
//!   module: src.linter.cli
//!   line-word: Linha
//!   error-word: Erro
//! ```
//!
//! Every key is optional. The file is parsed into a raw form first and
//! missing values are filled from the defaults.

use crate::document::LANGUAGE_ID;
use crate::error::LintError;
use crate::external::Protocol;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const CONFIG_FILE: &str = ".melodylint.yaml";

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Quiet period after an edit before the document is re-validated.
    pub debounce: Duration,
    /// Documents with any other language id are ignored.
    pub language_id: String,
    pub validator: ValidatorConfig,
}

/// How to run the workspace's deep validator and read its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    pub python: String,
    pub module: String,
    pub protocol: Protocol,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            language_id: LANGUAGE_ID.to_string(),
            validator: ValidatorConfig::default(),
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            python: default_python().to_string(),
            module: "src.linter.cli".to_string(),
            protocol: Protocol::default(),
        }
    }
}

fn default_python() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
    }
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    debounce_ms: Option<u64>,
    language_id: Option<String>,
    validator: Option<RawValidatorConfig>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawValidatorConfig {
    python: Option<String>,
    module: Option<String>,
    line_word: Option<String>,
    error_word: Option<String>,
}

impl Config {
    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, LintError> {
        // An empty file deserializes as null.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| LintError::Config(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, LintError> {
        let defaults = Self::default();
        let validator = raw.validator.unwrap_or_default();
        let protocol = Protocol {
            line_word: validator.line_word.unwrap_or(defaults.validator.protocol.line_word),
            error_word: validator.error_word.unwrap_or(defaults.validator.protocol.error_word),
        };
        if protocol.line_word.trim().is_empty() || protocol.error_word.trim().is_empty() {
            return Err(LintError::Config(
                "validator line-word and error-word must not be empty".to_string(),
            ));
        }

        Ok(Self {
            debounce: raw.debounce_ms.map(Duration::from_millis).unwrap_or(defaults.debounce),
            language_id: raw.language_id.unwrap_or(defaults.language_id),
            validator: ValidatorConfig {
                python: validator.python.unwrap_or(defaults.validator.python),
                module: validator.module.unwrap_or(defaults.validator.module),
                protocol,
            },
        })
    }

    /// Load configuration from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LintError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| LintError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load `.melodylint.yaml` from a workspace root, falling back to the
    /// defaults when the file does not exist.
    pub fn discover(workspace: impl AsRef<Path>) -> Result<Self, LintError> {
        let path = workspace.as_ref().join(CONFIG_FILE);
        if !path.is_file() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }
}
