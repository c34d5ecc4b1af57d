//! Misspelled keywords.
//!
//! Only whole tokens are looked up, so `ves` is reported but `vesper` is not.

use super::LineContext;
use crate::diagnostic::{Diagnostic, Severity};
use crate::keywords::typo_correction;
use crate::lexer::{find_column, tokens, width};

pub fn check(line: &LineContext, diagnostics: &mut Vec<Diagnostic>) {
    for word in tokens(line.stripped) {
        let Some(correction) = typo_correction(word) else {
            continue;
        };
        // Positions are relative to the comment-stripped line.
        if let Some(start) = find_column(line.stripped, word) {
            diagnostics.push(Diagnostic::on_line(
                line.index,
                start,
                start + width(word),
                format!("misspelled keyword: '{}'. Use '{}' instead.", word, correction),
                Severity::Warning,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::strip_comments;

    fn run(text: &str) -> Vec<Diagnostic> {
        let stripped = strip_comments(text);
        let mut out = Vec::new();
        check(&LineContext::new(0, text, &stripped), &mut out);
        out
    }

    #[test]
    fn test_reports_typo_with_correction() {
        let out = run("repitir 4 veses {");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].message, "misspelled keyword: 'repitir'. Use 'repetir' instead.");
        assert_eq!((out[0].range.start.column, out[0].range.end.column), (0, 7));
        assert!(out[1].message.contains("'vezes'"));
        assert_eq!((out[1].range.start.column, out[1].range.end.column), (10, 15));
        assert!(out.iter().all(|d| d.severity == Severity::Warning));
    }

    #[test]
    fn test_substrings_do_not_match() {
        assert!(run("tocar vesper minima;").is_empty());
        assert!(run("tempoo_rapido = 3;").is_empty());
    }

    #[test]
    fn test_case_sensitive() {
        assert!(run("Repitir 2 vezes {").is_empty());
    }

    #[test]
    fn test_typo_inside_comment_ignored() {
        assert!(run(r"tocar do minima; \_ repitir _/").is_empty());
    }

    #[test]
    fn test_position_uses_stripped_line() {
        let out = run(r"\_ c _/ tempu 120;");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].range.start.column, 1);
    }

    #[test]
    fn test_non_ascii_typo() {
        let out = run("} senão {");
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("'senao'"));
        assert_eq!((out[0].range.start.column, out[0].range.end.column), (2, 7));
    }
}
