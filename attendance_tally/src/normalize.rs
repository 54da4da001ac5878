//! Canonical comparison keys for hand-typed names.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::WhitespaceMode;

/// Turns a raw name into its comparison key.
///
/// The key is lower-cased, stripped of accents and of everything that is not
/// an ASCII letter, a digit or whitespace. Whitespace inside the name is kept
/// as typed.
///
/// ```
/// use attendance_tally::normalize::normalize_name;
///
/// assert_eq!(normalize_name("  JOSÉ  d'Ávila. "), "jose  davila");
/// assert_eq!(normalize_name(""), "");
/// ```
pub fn normalize_name(raw: &str) -> String {
    normalize_name_with(raw, WhitespaceMode::Preserve)
}

/// Same as [normalize_name], with control over internal whitespace.
pub fn normalize_name_with(raw: &str, whitespace_mode: WhitespaceMode) -> String {
    let lowered = raw.to_lowercase();
    let stripped: String = lowered
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    // Removing punctuation may expose new leading or trailing blanks ("ana ."):
    // trim again so that the key is a fixed point.
    match whitespace_mode {
        WhitespaceMode::Preserve => stripped.trim().to_string(),
        WhitespaceMode::Collapse => stripped.split_whitespace().collect::<Vec<&str>>().join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accents_and_case_are_ignored() {
        let expected = normalize_name("jose");
        assert_eq!(normalize_name("José"), expected);
        assert_eq!(normalize_name("JOSÉ"), expected);
        assert_eq!(normalize_name("João Conceição"), "joao conceicao");
        assert_eq!(normalize_name("Müller-Lüdenscheidt"), "mullerludenscheidt");
    }

    #[test]
    fn punctuation_is_removed_but_tokens_keep_their_order() {
        assert_eq!(normalize_name("Silva, João"), "silva joao");
        assert_eq!(normalize_name("João Silva"), "joao silva");
        assert_ne!(normalize_name("Silva, João"), normalize_name("João Silva"));
        assert_eq!(normalize_name("Dr. Ana (monitor) #2"), "dr ana monitor 2");
    }

    #[test]
    fn internal_whitespace_is_preserved() {
        assert_eq!(normalize_name("Ana  Silva"), "ana  silva");
        assert_eq!(normalize_name("\tAna Silva \n"), "ana silva");
    }

    #[test]
    fn collapse_mode_joins_whitespace_runs() {
        assert_eq!(
            normalize_name_with("Ana  \t Silva", WhitespaceMode::Collapse),
            "ana silva"
        );
        assert_eq!(
            normalize_name_with("Ana  Silva", WhitespaceMode::Collapse),
            normalize_name_with("ana silva", WhitespaceMode::Collapse)
        );
    }

    #[test]
    fn unreadable_input_maps_to_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
        assert_eq!(normalize_name("!!! ..."), "");
        assert_eq!(normalize_name("李小龍"), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "José",
            "ana .",
            " . ana",
            "Ana  Silva",
            "İlkay Gündoğan",
            "ﬁona",
            "Ø. Ærø",
            "a\u{00A0}b",
            "x \u{0301} y",
            "",
        ];
        for s in samples.iter() {
            for mode in [WhitespaceMode::Preserve, WhitespaceMode::Collapse] {
                let once = normalize_name_with(s, mode);
                let twice = normalize_name_with(&once, mode);
                assert_eq!(once, twice, "not idempotent for {:?} ({:?})", s, mode);
            }
        }
    }
}
