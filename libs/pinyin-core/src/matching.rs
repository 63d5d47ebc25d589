//! Answer matching for typed pinyin.

use crate::normalize::{clean, normalize, syllable_count, NormalizedPinyin};
use crate::types::{MatchOutcome, Pronunciation, VocabularyWord};
use serde::{Deserialize, Serialize};

/// Result of comparing typed pinyin to a word's accepted pronunciations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    /// Whether tones were required for this comparison.
    pub require_tones: bool,
    /// Normalized typed answer (toned form, for display).
    pub input_normalized: String,
    /// Index of the accepted pronunciation that decided the outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<usize>,
}

impl MatchResult {
    pub fn is_correct(&self) -> bool {
        self.outcome == MatchOutcome::Correct
    }
}

/// Classify typed pinyin against every accepted pronunciation.
///
/// A tone-exact match against any form wins. Otherwise a tone-stripped
/// match is `Partial` when tones are required and `Correct` when they are
/// not.
pub fn classify(input: &str, accepted: &[Pronunciation], require_tones: bool) -> MatchResult {
    let typed = normalize(input);
    let references = reference_forms(accepted);

    let (outcome, matched) = if typed.toned.is_empty() {
        (MatchOutcome::Incorrect, None)
    } else if let Some((idx, _)) = references.iter().find(|(_, r)| r.toned == typed.toned) {
        (MatchOutcome::Correct, Some(*idx))
    } else {
        match references.iter().find(|(_, r)| r.toneless == typed.toneless) {
            Some((idx, _)) if require_tones => (MatchOutcome::Partial, Some(*idx)),
            Some((idx, _)) => (MatchOutcome::Correct, Some(*idx)),
            None => (MatchOutcome::Incorrect, None),
        }
    };

    MatchResult {
        outcome,
        require_tones,
        input_normalized: typed.toned,
        matched,
    }
}

/// Classify typed pinyin for a vocabulary word.
///
/// A word without any usable pronunciation never matches; this is logged
/// rather than surfaced as an error.
pub fn classify_word(word: &VocabularyWord, input: &str, require_tones: bool) -> MatchResult {
    if !word.has_pronunciation() {
        tracing::warn!(
            word_id = %word.id,
            "word has no accepted pronunciation, answer treated as incorrect"
        );
    }
    classify(input, &word.pronunciations, require_tones)
}

/// Heuristic used to auto-check input while the user is still typing.
///
/// True when the input already matches, or when it has as many syllables
/// as the target and ends in a character that can end a syllable.
pub fn looks_complete(input: &str, word: &VocabularyWord, require_tones: bool) -> bool {
    let typed = clean(input);
    if typed.is_empty() {
        return false;
    }

    if classify(&typed, &word.pronunciations, require_tones).is_correct() {
        return true;
    }

    let references = reference_forms(&word.pronunciations);

    if !require_tones {
        let squashed = normalize(&typed).toneless.replace(' ', "");
        if references
            .iter()
            .any(|(_, r)| r.toneless.replace(' ', "") == squashed)
        {
            return true;
        }
    }

    let target_syllables = references
        .iter()
        .map(|(_, r)| syllable_count(&r.toned))
        .max()
        .unwrap_or(0);

    if syllable_count(&typed) != target_syllables {
        return false;
    }

    typed
        .chars()
        .last()
        .is_some_and(|last| is_terminal(last, require_tones))
}

fn is_terminal(c: char, require_tones: bool) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'ü' | 'n' | 'g' | 'r')
        || (require_tones && ('1'..='5').contains(&c))
}

fn reference_forms(accepted: &[Pronunciation]) -> Vec<(usize, NormalizedPinyin)> {
    accepted
        .iter()
        .enumerate()
        .flat_map(|(idx, p)| p.forms().map(move |form| (idx, normalize(form))))
        .collect()
}
