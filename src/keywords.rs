//! # Keyword Tables
//!
//! Fixed vocabulary of the MelodyScript language used by the static checks.
//!
//! Every table is a `static` slice: loaded once with the binary, never mutated,
//! safe to read from any thread.
//!
//! ## Tables
//! - [`RESERVED_KEYWORDS`] - words the language reserves
//! - [`COMMON_TYPOS`] - misspelling -> correct keyword
//! - [`VALID_NOTES`] - solfege and letter note names
//! - [`VALID_DURATIONS`] - rhythmic values accepted by `tocar` and `pausa`
//! - [`VALID_WAVEFORMS`] - oscillator shapes accepted by `forma_onda`
//! - [`TERMINATED_COMMANDS`] - statements that must end with `;`
//! - [`COMMON_PARAMETERS`] - identifiers usually bound as function parameters

use serde::Serialize;

pub const PLAY: &str = "tocar";
pub const REST: &str = "pausa";
pub const WAVEFORM: &str = "forma_onda";
pub const CHORD_DEFINITION: &str = "acorde";
pub const FUNCTION: &str = "funcao";

pub static RESERVED_KEYWORDS: &[&str] = &[
    "melodia",
    "tocar",
    "pausa",
    "repetir",
    "vezes",
    "tempo",
    "instrumento",
    "forma_onda",
    "acorde",
    "envelope",
    "attack",
    "decay",
    "sustain",
    "release",
    "funcao",
    "retornar",
    "escala",
    "se",
    "senao",
    "configurar_envelope",
    "configurar_forma_onda",
    "para_cada",
    "em",
    "reverso",
];

pub static COMMON_TYPOS: &[(&str, &str)] = &[
    ("tocar_acode", "tocar_acorde"),
    ("repitir", "repetir"),
    ("veses", "vezes"),
    ("ves", "vezes"),
    ("tempu", "tempo"),
    ("tempoo", "tempo"),
    ("tiempo", "tempo"),
    ("instrumentu", "instrumento"),
    ("imstrumento", "instrumento"),
    ("envelope_config", "configurar_envelope"),
    ("senão", "senao"),
    ("envleope", "envelope"),
    ("atacar", "attack"),
    ("sustain_level", "sustain"),
    ("liberar", "release"),
    ("decaimento", "decay"),
    ("ataque", "attack"),
    ("funçao", "funcao"),
    ("funcion", "funcao"),
    ("function", "funcao"),
];

pub static VALID_NOTES: &[&str] = &[
    "do", "re", "mi", "fa", "sol", "la", "si", "c", "d", "e", "f", "g", "a", "b",
];

pub static VALID_DURATIONS: &[&str] = &[
    "breve",
    "semibreve",
    "minima",
    "seminima",
    "colcheia",
    "semicolcheia",
    "fusa",
    "semifusa",
];

pub static VALID_WAVEFORMS: &[&str] = &["sine", "square", "triangle", "sawtooth"];

pub static TERMINATED_COMMANDS: &[&str] = &[
    "tocar",
    "pausa",
    "tempo",
    "instrumento",
    "forma_onda",
    "configurar_envelope",
    "configurar_forma_onda",
];

pub static COMMON_PARAMETERS: &[&str] = &[
    "duracao",
    "acorde",
    "nota",
    "tom",
    "tempo",
    "velocidade",
    "parametro",
    "valor",
    "freq",
    "frequencia",
    "oitava",
    "tonalidade",
    "volume",
    "intensidade",
];

/// Correction for a known misspelling (exact, case-sensitive).
pub fn typo_correction(word: &str) -> Option<&'static str> {
    COMMON_TYPOS
        .iter()
        .find(|(typo, _)| *typo == word)
        .map(|(_, correct)| *correct)
}

pub fn is_valid_note(name: &str) -> bool {
    VALID_NOTES.contains(&name)
}

pub fn is_valid_duration(word: &str) -> bool {
    VALID_DURATIONS.contains(&word)
}

pub fn is_valid_waveform(word: &str) -> bool {
    VALID_WAVEFORMS.contains(&word)
}

pub fn is_common_parameter(word: &str) -> bool {
    COMMON_PARAMETERS.contains(&word)
}

/// Guess whether `word` names a value passed in at runtime rather than a literal.
///
/// True for the usual parameter names, and for anything that is neither a
/// valid duration nor contains a digit. This accepts plenty of genuinely wrong
/// tokens; the checks would rather stay quiet than flag a variable reference.
pub fn is_probable_parameter(word: &str) -> bool {
    if is_common_parameter(word) {
        return true;
    }
    !is_valid_duration(word) && !word.chars().any(|c| c.is_ascii_digit())
}

/// Snapshot of every table, for dumping as YAML.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Tables {
    pub reserved_keywords: &'static [&'static str],
    pub common_typos: Vec<TypoEntry>,
    pub valid_notes: &'static [&'static str],
    pub valid_durations: &'static [&'static str],
    pub valid_waveforms: &'static [&'static str],
    pub terminated_commands: &'static [&'static str],
    pub common_parameters: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct TypoEntry {
    pub typo: &'static str,
    pub correction: &'static str,
}

pub fn tables() -> Tables {
    Tables {
        reserved_keywords: RESERVED_KEYWORDS,
        common_typos: COMMON_TYPOS
            .iter()
            .map(|&(typo, correction)| TypoEntry { typo, correction })
            .collect(),
        valid_notes: VALID_NOTES,
        valid_durations: VALID_DURATIONS,
        valid_waveforms: VALID_WAVEFORMS,
        terminated_commands: TERMINATED_COMMANDS,
        common_parameters: COMMON_PARAMETERS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typo_lookup_is_case_sensitive() {
        assert_eq!(typo_correction("repitir"), Some("repetir"));
        assert_eq!(typo_correction("Repitir"), None);
        assert_eq!(typo_correction("repetir"), None);
    }

    #[test]
    fn test_typos_never_map_to_themselves() {
        for (typo, correction) in COMMON_TYPOS {
            assert_ne!(typo, correction);
        }
    }

    #[test]
    fn test_common_parameter_names() {
        assert!(is_probable_parameter("duracao"));
        assert!(is_probable_parameter("tempo"));
    }

    #[test]
    fn test_identifiers_without_digits_look_like_parameters() {
        assert!(is_probable_parameter("xyz"));
        assert!(is_probable_parameter("minha_duracao"));
    }

    #[test]
    fn test_valid_durations_are_not_parameters() {
        assert!(!is_probable_parameter("minima"));
        assert!(!is_probable_parameter("colcheia"));
    }

    #[test]
    fn test_digits_rule_out_parameters() {
        assert!(!is_probable_parameter("4"));
        assert!(!is_probable_parameter("dur2"));
    }

    #[test]
    fn test_typo_corrections_are_reserved_or_commands() {
        for (_, correction) in COMMON_TYPOS {
            assert!(
                RESERVED_KEYWORDS.contains(correction) || correction.starts_with("tocar_"),
                "{}",
                correction
            );
        }
    }

    #[test]
    fn test_tables_snapshot_serializes() {
        let yaml = serde_yaml::to_string(&tables()).unwrap();
        assert!(yaml.contains("valid-waveforms"));
        assert!(yaml.contains("sawtooth"));
        assert!(yaml.contains("correction: vezes"));
    }
}
