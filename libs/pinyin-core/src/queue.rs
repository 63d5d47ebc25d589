//! Practice queue selection.

use crate::curriculum::Curriculum;
use crate::progress::ProgressLedger;
use crate::types::{PracticeMode, PracticeSettings, VocabularyWord, WordId};
use crate::vocabulary::Vocabulary;
use rand::seq::SliceRandom;
use rand::Rng;

/// Build the ordered list of word ids for one practice run.
///
/// - sequential: selected levels, by frequency ascending
/// - random: selected levels shuffled, unseen words first
/// - review mistakes: words whose last answer was not correct, shuffled
/// - chapter: selected chapters shuffled, unseen words first
///
/// Chapter ids the curriculum does not know are skipped.
pub fn build_queue<R: Rng + ?Sized>(
    vocabulary: &Vocabulary,
    curriculum: &Curriculum,
    settings: &PracticeSettings,
    ledger: &ProgressLedger,
    rng: &mut R,
) -> Vec<WordId> {
    let mut words: Vec<&VocabularyWord> = match settings.practice_mode {
        PracticeMode::Sequential => {
            let mut words: Vec<_> = vocabulary.for_levels(&settings.selected_levels).collect();
            words.sort_by_key(|w| w.frequency);
            words
        }
        PracticeMode::Random => {
            let mut words: Vec<_> = vocabulary.for_levels(&settings.selected_levels).collect();
            words.shuffle(rng);
            unseen_first(&mut words, ledger);
            words
        }
        PracticeMode::ReviewMistakes => {
            let incorrect = ledger.incorrect_word_ids();
            let mut words: Vec<_> = vocabulary
                .words()
                .iter()
                .filter(|w| incorrect.contains(&w.id))
                .collect();
            words.shuffle(rng);
            words
        }
        PracticeMode::Chapter => {
            let mut words: Vec<_> = settings
                .selected_chapters
                .iter()
                .filter(|chapter| {
                    let known = curriculum.contains(**chapter);
                    if !known {
                        tracing::debug!(%chapter, "dropping unknown chapter from selection");
                    }
                    known
                })
                .flat_map(|chapter| vocabulary.for_chapter(*chapter))
                .collect();
            words.shuffle(rng);
            unseen_first(&mut words, ledger);
            words
        }
    };

    tracing::debug!(
        mode = settings.practice_mode.as_str(),
        size = words.len(),
        "built practice queue"
    );
    words.into_iter().map(|w| w.id.clone()).collect()
}

/// Stable partition: never-answered words move ahead, order otherwise kept.
fn unseen_first(words: &mut [&VocabularyWord], ledger: &ProgressLedger) {
    words.sort_by_key(|w| ledger.has_seen(&w.id));
}
