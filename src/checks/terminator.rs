//! Statements missing their `;` terminator.
//!
//! A naive "every command ends with `;`" rule fires on legitimate shapes, so
//! two exceptions apply:
//! - a `tocar` line holding chord brackets is only flagged once the chord
//!   literal and its duration are both written (`tocar <do mi sol> minima`)
//! - a line opening a block (`{`) or ending one (`}`) is a header, not a
//!   statement
//!
//! Chord definitions (`acorde X = <...>`) get their own warning.

use super::LineContext;
use crate::diagnostic::{Diagnostic, Severity};
use crate::keywords::{CHORD_DEFINITION, PLAY, TERMINATED_COMMANDS};
use regex::Regex;
use std::sync::LazyLock;

static COMPLETE_CHORD_PLAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"tocar\s+<([^>]+)>\s+\w+").expect("chord play pattern is valid")
});

pub fn check(line: &LineContext, diagnostics: &mut Vec<Diagnostic>) {
    let text = line.trimmed;
    if text.is_empty() || text.ends_with(';') {
        return;
    }
    let (start, end) = line.statement_range();

    for &command in TERMINATED_COMMANDS {
        // A bare keyword is not a statement yet.
        if !text.starts_with(command) || text == command {
            continue;
        }
        let missing = if command == PLAY && (text.contains('<') || text.contains('>')) {
            COMPLETE_CHORD_PLAY.is_match(text)
        } else {
            !text.contains('{') && !text.ends_with('}')
        };
        if missing {
            diagnostics.push(Diagnostic::on_line(
                line.index,
                start,
                end,
                format!("missing statement terminator for command '{}'", command),
                Severity::Warning,
            ));
        }
    }

    if text.starts_with(CHORD_DEFINITION) && text.contains('=') && text.contains('>') {
        diagnostics.push(Diagnostic::on_line(
            line.index,
            start,
            end,
            "missing statement terminator for chord definition",
            Severity::Warning,
        ));
    }
}
