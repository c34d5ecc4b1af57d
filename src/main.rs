use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use melodylint::external::render_protocol;
use melodylint::{has_errors, keywords, Config, Diagnostic, Document, LintError, LintSession};
use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Syntax checker for MelodyScript (.mscr) files
#[derive(Parser)]
#[command(name = "melodylint", version)]
#[command(about = "A real-time syntax checker for the MelodyScript music notation language")]
struct Args {
    /// Log level
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Configuration file (default: .melodylint.yaml in the workspace)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Workspace root (default: current directory)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Check files and print their diagnostics
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Re-check a file whenever it changes
    Watch { file: PathBuf },
    /// Run a file with the workspace's interpreter
    Run { file: PathBuf },
    /// Print the keyword tables as YAML
    Tables,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    /// `Linha N: ...` lines, as read back by the editor extension
    Protocol,
}

#[derive(Serialize)]
struct FileReport<'a> {
    file: &'a str,
    diagnostics: &'a [Diagnostic],
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(&args.log_level)
        .with_writer(std::io::stderr)
        .init();

    let workspace = match &args.workspace {
        Some(path) => path.clone(),
        None => env::current_dir().context("cannot determine the current directory")?,
    };
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&workspace)?,
    };

    match args.command {
        Cmd::Check { files, format } => check(&files, format, &config),
        Cmd::Watch { file } => watch(&file, &workspace, config),
        Cmd::Run { file } => run(&file, &workspace, config),
        Cmd::Tables => {
            print!("{}", serde_yaml::to_string(&keywords::tables())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn check(files: &[PathBuf], format: Format, config: &Config) -> Result<ExitCode> {
    let mut documents = Vec::with_capacity(files.len());
    for file in files {
        let document = Document::from_path(file)?;
        let diagnostics = melodylint::validate_document(&document);
        documents.push((document, diagnostics));
    }

    match format {
        Format::Text => {
            for (document, diagnostics) in &documents {
                for diagnostic in diagnostics {
                    println!("{}:{}", document.uri, diagnostic);
                }
            }
        }
        Format::Json => {
            let reports: Vec<FileReport> = documents
                .iter()
                .map(|(document, diagnostics)| FileReport {
                    file: &document.uri,
                    diagnostics,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Format::Protocol => {
            for (_, diagnostics) in &documents {
                print!("{}", render_protocol(diagnostics, &config.validator.protocol));
            }
        }
    }

    let failed = documents.iter().any(|(_, diagnostics)| has_errors(diagnostics));
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn watch(file: &Path, workspace: &Path, config: Config) -> Result<ExitCode> {
    let document = Document::from_path(file)?;
    let uri = document.uri.clone();
    let mut session = LintSession::new(config).with_workspace(workspace);
    let mut last_text = document.text.clone();
    if !session.on_open(document) {
        let language = session
            .document(&uri)
            .map(|d| d.language_id.clone())
            .unwrap_or_default();
        return Err(LintError::WrongLanguage(language).into());
    }
    info!("watching {}", uri);
    print_session(&session, &uri);

    loop {
        thread::sleep(WATCH_POLL_INTERVAL);
        let now = Instant::now();
        match Document::from_path(file) {
            Ok(document) if document.text != last_text => {
                last_text = document.text.clone();
                session.on_change(document, now);
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "cannot re-read watched file"),
        }
        if session.tick(now) > 0 {
            print_session(&session, &uri);
        }
    }
}

fn print_session(session: &LintSession, uri: &str) {
    let diagnostics = session.diagnostics(uri);
    println!("--- {} ({} diagnostics)", uri, diagnostics.len());
    for diagnostic in diagnostics {
        println!("{}", diagnostic);
    }
}

fn run(file: &Path, workspace: &Path, config: Config) -> Result<ExitCode> {
    let workspace = fs::canonicalize(workspace)
        .with_context(|| format!("cannot resolve workspace '{}'", workspace.display()))?;
    let file = fs::canonicalize(file).map_err(|source| LintError::Io {
        path: file.to_path_buf(),
        source,
    })?;

    let mut session = LintSession::new(config).with_workspace(&workspace);
    session.on_open(Document::from_path(&file)?);
    info!("running {}", file.display());
    let status = session.run_command()?;
    Ok(if status.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
