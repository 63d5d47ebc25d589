//! Pinyin normalization.
//!
//! Produces two comparable forms of a pronunciation string:
//! - `toned`: every syllable in numeric-tone form (`nǐ hǎo` -> `ni3 hao3`,
//!   an unmarked syllable gets the neutral tone `5`)
//! - `toneless`: tone digits and tone marks removed (`ni hao`)
//!
//! Spaces separate syllables and are kept as-is after collapsing.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Normalized forms of a pronunciation string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPinyin {
    pub toned: String,
    pub toneless: String,
}

/// Normalize typed or reference pinyin into its toned and toneless forms.
pub fn normalize(text: &str) -> NormalizedPinyin {
    let cleaned = clean(text);
    let toned = map_syllables(&cleaned, canonical_syllable);
    let toneless = map_syllables(&cleaned, toneless_syllable);
    NormalizedPinyin { toned, toneless }
}

/// Toneless form only.
pub fn strip_tones(text: &str) -> String {
    map_syllables(&clean(text), toneless_syllable)
}

/// Number of space-separated syllables.
pub fn syllable_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercase, compose, trim and collapse whitespace, spell ü consistently.
pub(crate) fn clean(text: &str) -> String {
    let lowered: String = text.to_lowercase().nfc().collect();
    lowered
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("u:", "ü")
        .replace('v', "ü")
}

fn map_syllables(cleaned: &str, f: fn(&str) -> String) -> String {
    cleaned.split(' ').map(f).collect::<Vec<_>>().join(" ")
}

/// Plain letter and tone number for a tone-marked vowel.
fn tone_mark(c: char) -> Option<(char, u8)> {
    let mapped = match c {
        'ā' => ('a', 1),
        'á' => ('a', 2),
        'ǎ' => ('a', 3),
        'à' => ('a', 4),
        'ē' => ('e', 1),
        'é' => ('e', 2),
        'ě' => ('e', 3),
        'è' => ('e', 4),
        'ī' => ('i', 1),
        'í' => ('i', 2),
        'ǐ' => ('i', 3),
        'ì' => ('i', 4),
        'ō' => ('o', 1),
        'ó' => ('o', 2),
        'ǒ' => ('o', 3),
        'ò' => ('o', 4),
        'ū' => ('u', 1),
        'ú' => ('u', 2),
        'ǔ' => ('u', 3),
        'ù' => ('u', 4),
        'ǖ' => ('ü', 1),
        'ǘ' => ('ü', 2),
        'ǚ' => ('ü', 3),
        'ǜ' => ('ü', 4),
        'ḿ' => ('m', 2),
        'ń' => ('n', 2),
        'ň' => ('n', 3),
        'ǹ' => ('n', 4),
        _ => return None,
    };
    Some(mapped)
}

fn is_tone_digit(c: char) -> bool {
    ('1'..='5').contains(&c)
}

fn plain(syllable: &str) -> (String, Vec<u8>) {
    let mut base = String::with_capacity(syllable.len());
    let mut tones = Vec::new();
    for c in syllable.chars() {
        match tone_mark(c) {
            Some((letter, tone)) => {
                base.push(letter);
                tones.push(tone);
            }
            None => base.push(c),
        }
    }
    (base, tones)
}

/// Numeric-tone form of one space-separated chunk.
///
/// Apostrophe-joined syllables (`xī'ān`) are converted one by one. A chunk
/// that is otherwise unsegmented keeps a single mark as a trailing digit
/// (`xièxie` -> `xiexie4`), which is only comparable with another
/// normalized string, never with a hand-written numeric form.
fn canonical_syllable(chunk: &str) -> String {
    chunk
        .split('\'')
        .map(canonical_part)
        .collect::<Vec<_>>()
        .join("'")
}

fn canonical_part(syllable: &str) -> String {
    let (base, marks) = plain(syllable);
    let digit = base.chars().last().filter(|c| is_tone_digit(*c));

    match (marks.as_slice(), digit) {
        ([], Some(_)) => base,
        ([], None) if !base.is_empty() && base.chars().all(char::is_alphabetic) => {
            format!("{base}5")
        }
        ([], None) => base,
        ([tone], None) => format!("{base}{tone}"),
        ([tone], Some(d)) if d.to_digit(10) == Some(u32::from(*tone)) => base,
        // Conflicting or multiple marks: leave for exact comparison.
        _ => syllable.to_string(),
    }
}

/// Marks removed and every tone digit that follows a letter dropped.
fn toneless_syllable(chunk: &str) -> String {
    let (base, _) = plain(chunk);
    let mut out = String::with_capacity(base.len());
    let mut after_letter = false;
    for c in base.chars() {
        if after_letter && is_tone_digit(c) {
            continue;
        }
        after_letter = c.is_alphabetic();
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diacritic_and_numeric_forms_agree() {
        let diacritic = normalize("nǐ hǎo");
        let numeric = normalize("ni3 hao3");
        assert_eq!(diacritic, numeric);
        assert_eq!(diacritic.toned, "ni3 hao3");
        assert_eq!(diacritic.toneless, "ni hao");
    }

    #[test]
    fn test_case_and_whitespace() {
        assert_eq!(normalize("  NI3   HAO3 ").toned, "ni3 hao3");
        assert_eq!(normalize("\tNǏ\nhǎo").toneless, "ni hao");
    }

    #[test]
    fn test_unmarked_syllable_is_neutral_tone() {
        assert_eq!(normalize("bà ba").toned, "ba4 ba5");
        assert_eq!(normalize("ba4 ba5").toned, "ba4 ba5");
        assert_eq!(normalize("ba ba").toned, "ba5 ba5");
        assert_eq!(normalize("bà ba").toneless, "ba ba");
    }

    #[test]
    fn test_u_umlaut_spellings() {
        assert_eq!(normalize("lǜ").toned, "lü4");
        assert_eq!(normalize("lu:4").toned, "lü4");
        assert_eq!(normalize("lv4").toned, "lü4");
        assert_eq!(strip_tones("nǚ ér"), "nü er");
    }

    #[test]
    fn test_decomposed_marks_are_composed() {
        // a + combining macron
        assert_eq!(normalize("ma\u{0304}").toned, "ma1");
        assert_eq!(normalize("lu\u{0308}\u{0300}").toned, "lü4");
    }

    #[test]
    fn test_unsegmented_input_keeps_segmentation() {
        let n = normalize("nǐhǎo");
        assert_eq!(n.toned, "nǐhǎo");
        assert_eq!(n.toneless, "nihao");
        assert_ne!(n.toneless, normalize("nǐ hǎo").toneless);
    }

    #[test]
    fn test_consistent_mark_and_digit() {
        assert_eq!(normalize("nǐ3").toned, "ni3");
        assert_eq!(normalize("nǐ4").toned, "nǐ4");
        assert_eq!(normalize("nǐ4").toneless, "ni");
    }

    #[test]
    fn test_syllabic_nasals() {
        assert_eq!(normalize("ń").toned, "n2");
        assert_eq!(strip_tones("ǹg"), "ng");
    }

    #[test]
    fn test_empty_input() {
        let n = normalize("   ");
        assert_eq!(n.toned, "");
        assert_eq!(n.toneless, "");
        assert_eq!(syllable_count("  "), 0);
        assert_eq!(syllable_count("zhōng guó"), 2);
    }

    #[test]
    fn test_unsegmented_numeric_input_loses_all_digits() {
        assert_eq!(strip_tones("xie4xie5"), "xiexie");
        assert_eq!(strip_tones("ni3hao3"), "nihao");
        assert_eq!(strip_tones("xie4xie5"), strip_tones("xièxie"));
        assert_eq!(strip_tones("ni3hao3"), strip_tones("nǐhǎo"));
        assert_eq!(strip_tones("lv4se4"), "lüse");
    }

    #[test]
    fn test_apostrophe_joined_syllables() {
        let marked = normalize("xī'ān");
        let numeric = normalize("xi1'an1");
        assert_eq!(marked, numeric);
        assert_eq!(marked.toned, "xi1'an1");
        assert_eq!(marked.toneless, "xi'an");
        assert_eq!(normalize("xi'an").toned, "xi5'an5");
    }

    #[test]
    fn test_toned_and_numeric_strip_to_the_same_string() {
        let pairs = [
            ("nǐ hǎo", "ni3 hao3"),
            ("xiè xie", "xie4 xie5"),
            ("xièxie", "xie4xie5"),
            ("xī'ān", "xi1'an1"),
            ("lǜ chá", "lu:4 cha2"),
        ];
        for (marked, numeric) in pairs {
            assert_eq!(strip_tones(marked), strip_tones(numeric), "{marked} / {numeric}");
        }
    }

    #[test]
    fn test_digits_not_after_a_letter_are_kept() {
        assert_eq!(strip_tones("3"), "3");
        assert_eq!(strip_tones("a 2"), "a 2");
    }
}
