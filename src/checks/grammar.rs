//! Argument checks for `tocar`, `pausa` and `forma_onda`.
//!
//! The command is picked from the line prefix ([`Command::from_line`]) and
//! each variant has its own rule:
//!
//! | command | shape | checked |
//! |---|---|---|
//! | `tocar` | `tocar <note> <duration>;` or `tocar <a b c> <duration>;` | duration |
//! | `pausa` | `pausa <duration>;` | duration |
//! | `forma_onda` | `forma_onda <waveform>;` | waveform |
//!
//! Notes and chord contents are never rejected: a word that is not a known
//! note may be a chord or variable name bound elsewhere.
//!
//! A duration is accepted when it is in the duration table or a common
//! parameter name. Inside a `funcao` body any digit-free word is accepted too,
//! since it can be one of the function's parameters.

use super::LineContext;
use crate::diagnostic::{Diagnostic, Severity};
use crate::keywords::{
    is_common_parameter, is_probable_parameter, is_valid_duration, is_valid_note,
    is_valid_waveform, PLAY, REST, VALID_DURATIONS, VALID_WAVEFORMS, WAVEFORM,
};
use crate::lexer::tokens;
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

static NOTE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z]+)([#b])?$").expect("note pattern is valid"));

/// Commands with argument rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Rest,
    Waveform,
}

impl Command {
    /// Command a trimmed line starts with, if any. The keyword must be
    /// followed by a space.
    pub fn from_line(text: &str) -> Option<Self> {
        [Command::Play, Command::Rest, Command::Waveform]
            .into_iter()
            .find(|command| {
                text.strip_prefix(command.keyword())
                    .is_some_and(|rest| rest.starts_with(' '))
            })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Command::Play => PLAY,
            Command::Rest => REST,
            Command::Waveform => WAVEFORM,
        }
    }

    fn usage(self) -> &'static str {
        match self {
            Command::Play => "'tocar <note> <duration>;' or 'tocar <chord> <duration>;'",
            Command::Rest => "'pausa <duration>;'",
            Command::Waveform => "'forma_onda <waveform>;'",
        }
    }
}

pub fn check(line: &LineContext, diagnostics: &mut Vec<Diagnostic>) {
    let Some(command) = Command::from_line(line.trimmed) else {
        return;
    };
    let statement = line.trimmed.strip_suffix(';').unwrap_or(line.trimmed);
    let parts = tokens(statement);

    match command {
        Command::Play => check_play(line, &parts, diagnostics),
        Command::Rest => check_rest(line, &parts, diagnostics),
        Command::Waveform => check_waveform(line, &parts, diagnostics),
    }
}

fn check_play(line: &LineContext, parts: &[&str], diagnostics: &mut Vec<Diagnostic>) {
    if parts.len() < 3 {
        diagnostics.push(incomplete(line, Command::Play));
        return;
    }

    let duration = if parts[1].starts_with('<') {
        // Chord literal: contents are not checked, the duration follows `>`.
        // An unclosed literal is left to the balance check.
        parts
            .iter()
            .position(|p| p.ends_with('>'))
            .and_then(|close| parts.get(close + 1).copied())
    } else {
        if let Some(caps) = NOTE_NAME.captures(parts[1]) {
            if !is_valid_note(&caps[1]) {
                trace!(token = parts[1], "unknown note name accepted as identifier");
            }
        }
        Some(parts[2])
    };

    if let Some(duration) = duration {
        if !accepts_duration(line, duration) {
            diagnostics.push(invalid_duration(line, duration));
        }
    }
}

fn check_rest(line: &LineContext, parts: &[&str], diagnostics: &mut Vec<Diagnostic>) {
    match parts.get(1) {
        None => diagnostics.push(incomplete(line, Command::Rest)),
        Some(&duration) => {
            if !accepts_duration(line, duration) {
                diagnostics.push(invalid_duration(line, duration));
            }
        }
    }
}

fn check_waveform(line: &LineContext, parts: &[&str], diagnostics: &mut Vec<Diagnostic>) {
    if let Some(&waveform) = parts.get(1) {
        if !is_valid_waveform(waveform) {
            let (start, end) = line.token_range(waveform);
            diagnostics.push(Diagnostic::on_line(
                line.index,
                start,
                end,
                format!(
                    "invalid waveform: '{}'. Valid values: {}",
                    waveform,
                    VALID_WAVEFORMS.join(", ")
                ),
                Severity::Error,
            ));
        }
    }
}

fn accepts_duration(line: &LineContext, word: &str) -> bool {
    is_valid_duration(word)
        || is_common_parameter(word)
        || (line.in_function && is_probable_parameter(word))
}

fn invalid_duration(line: &LineContext, duration: &str) -> Diagnostic {
    let (start, end) = line.token_range(duration);
    Diagnostic::on_line(
        line.index,
        start,
        end,
        format!(
            "invalid duration: '{}'. Valid values: {}",
            duration,
            VALID_DURATIONS.join(", ")
        ),
        Severity::Error,
    )
}

fn incomplete(line: &LineContext, command: Command) -> Diagnostic {
    let (start, end) = line.statement_range();
    Diagnostic::on_line(
        line.index,
        start,
        end,
        format!(
            "incomplete command '{}'. Usage: {}",
            command.keyword(),
            command.usage()
        ),
        Severity::Error,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::strip_comments;

    fn run(text: &str) -> Vec<Diagnostic> {
        run_in(text, false)
    }

    fn run_in(text: &str, in_function: bool) -> Vec<Diagnostic> {
        let stripped = strip_comments(text);
        let mut out = Vec::new();
        check(
            &LineContext::new(0, text, &stripped).in_function(in_function),
            &mut out,
        );
        out
    }

    #[test]
    fn test_command_dispatch() {
        assert_eq!(Command::from_line("tocar do minima;"), Some(Command::Play));
        assert_eq!(Command::from_line("pausa minima;"), Some(Command::Rest));
        assert_eq!(Command::from_line("forma_onda sine;"), Some(Command::Waveform));
        assert_eq!(Command::from_line("tocar_acorde x;"), None);
        assert_eq!(Command::from_line("tocar"), None);
    }

    #[test]
    fn test_valid_play() {
        assert!(run("tocar do minima;").is_empty());
        assert!(run("tocar fa# colcheia;").is_empty());
        assert!(run("tocar DoMaior semibreve;").is_empty());
    }

    #[test]
    fn test_invalid_duration_position() {
        let out = run("tocar do xyz;");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity, Severity::Error);
        assert_eq!((out[0].range.start.column, out[0].range.end.column), (9, 12));
        assert_eq!(
            out[0].message,
            "invalid duration: 'xyz'. Valid values: breve, semibreve, minima, seminima, colcheia, semicolcheia, fusa, semifusa"
        );
    }

    #[test]
    fn test_position_follows_original_line() {
        let out = run(r"\_ nota _/   tocar   re   4;");
        assert_eq!(out.len(), 1);
        assert_eq!((out[0].range.start.column, out[0].range.end.column), (26, 27));
    }

    #[test]
    fn test_incomplete_play() {
        let out = run("tocar do;");
        assert_eq!(out.len(), 1);
        assert!(out[0].message.starts_with("incomplete command 'tocar'"));
        assert_eq!((out[0].range.start.column, out[0].range.end.column), (0, 9));
    }

    #[test]
    fn test_chord_literal() {
        assert!(run("tocar <do mi sol> minima;").is_empty());
        assert!(run("tocar <xx yy> minima;").is_empty());
        let out = run("tocar <do mi sol> m1nima;");
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("'m1nima'"));
    }

    #[test]
    fn test_chord_literal_without_duration() {
        assert!(run("tocar <do mi sol>;").is_empty());
        assert!(run("tocar <do mi sol minima;").is_empty());
    }

    #[test]
    fn test_common_parameter_accepted_everywhere() {
        assert!(run("tocar nota duracao;").is_empty());
        assert!(run("pausa tempo;").is_empty());
    }

    #[test]
    fn test_identifier_accepted_only_inside_function() {
        assert_eq!(run("tocar do d;").len(), 1);
        assert!(run_in("tocar do d;", true).is_empty());
        assert_eq!(run_in("tocar do d2;", true).len(), 1);
    }

    #[test]
    fn test_rest() {
        assert!(run("pausa seminima;").is_empty());
        let out = run("pausa longa;");
        assert_eq!(out.len(), 1);
        assert_eq!((out[0].range.start.column, out[0].range.end.column), (6, 11));
    }

    #[test]
    fn test_incomplete_rest() {
        let out = run("pausa ;");
        assert_eq!(out.len(), 1);
        assert!(out[0].message.starts_with("incomplete command 'pausa'"));
    }

    #[test]
    fn test_waveform() {
        assert!(run("forma_onda square;").is_empty());
        let out = run("forma_onda ruido;");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity, Severity::Error);
        assert!(out[0]
            .message
            .ends_with("Valid values: sine, square, triangle, sawtooth"));
        assert_eq!((out[0].range.start.column, out[0].range.end.column), (11, 16));
    }
}
