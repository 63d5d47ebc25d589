//! Vocabulary lists: HSK JSON parsing, chapter assignment and lookups.
//!
//! # Format
//! ```json
//! [{ "s": "爱", "r": "爫", "q": 1, "p": ["v"],
//!    "f": [{ "t": "愛", "i": { "y": "ài", "n": "ai4" }, "m": ["to love"] }] }]
//! ```
//! Long key names (`simplified`, `frequency`, `forms`, `traditional`,
//! `transcriptions`, `pinyin`, `numeric`, `meanings`) are accepted too.

use crate::curriculum::Curriculum;
use crate::error::{Result, VocabularyError};
use crate::progress::ProgressLedger;
use crate::types::{ChapterId, HskLevel, Pronunciation, VocabularyWord};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(alias = "simplified")]
    s: String,
    #[serde(default, alias = "frequency")]
    q: u32,
    #[serde(default, alias = "forms")]
    f: Vec<RawForm>,
}

#[derive(Debug, Deserialize)]
struct RawForm {
    #[serde(default, alias = "traditional")]
    t: Option<String>,
    #[serde(default, alias = "transcriptions")]
    i: Option<RawTranscriptions>,
    #[serde(default, alias = "meanings")]
    m: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTranscriptions {
    #[serde(default, alias = "pinyin")]
    y: Option<String>,
    #[serde(default, alias = "numeric")]
    n: Option<String>,
}

/// Parse one level's word list.
pub fn parse_hsk_list(level: HskLevel, json: &str) -> Result<Vec<VocabularyWord>> {
    let entries: Vec<RawEntry> =
        serde_json::from_str(json).map_err(|source| VocabularyError::Json {
            level: level.number(),
            source,
        })?;

    Ok(entries.into_iter().map(|entry| into_word(level, entry)).collect())
}

fn into_word(level: HskLevel, entry: RawEntry) -> VocabularyWord {
    let mut pronunciations: Vec<Pronunciation> = Vec::new();
    for form in &entry.f {
        let Some(i) = &form.i else { continue };
        let p = Pronunciation {
            diacritic: i.y.clone().filter(|s| !s.trim().is_empty()),
            numeric: i.n.clone().filter(|s| !s.trim().is_empty()),
        };
        if p.is_usable() && !pronunciations.contains(&p) {
            pronunciations.push(p);
        }
    }

    if pronunciations.is_empty() {
        tracing::warn!(
            word = %entry.s,
            level = level.number(),
            "vocabulary entry has no pronunciation"
        );
    }

    let first = entry.f.first();
    VocabularyWord {
        id: entry.s.clone(),
        traditional: first
            .and_then(|f| f.t.clone())
            .unwrap_or_else(|| entry.s.clone()),
        meanings: first.map(|f| f.m.clone()).unwrap_or_default(),
        simplified: entry.s,
        level,
        chapter: None,
        frequency: entry.q,
        pronunciations,
    }
}

/// Indexed, read-only vocabulary.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<VocabularyWord>,
    by_id: HashMap<String, usize>,
    by_chapter: BTreeMap<ChapterId, Vec<usize>>,
}

impl Vocabulary {
    /// Index words and give every untagged word a chapter.
    ///
    /// Untagged words of a level are sorted by frequency and split into
    /// contiguous, near-equal runs over the level's non-review chapters.
    pub fn new(words: Vec<VocabularyWord>, curriculum: &Curriculum) -> Self {
        let mut seen = BTreeSet::new();
        let mut words: Vec<VocabularyWord> = words
            .into_iter()
            .filter(|w| {
                let fresh = seen.insert(w.id.clone());
                if !fresh {
                    tracing::warn!(word_id = %w.id, "duplicate vocabulary id dropped");
                }
                fresh
            })
            .collect();

        for word in &mut words {
            if let Some(chapter) = word.chapter {
                if !curriculum.contains(chapter)
                    || curriculum.is_review(chapter)
                    || chapter.level != word.level
                {
                    tracing::warn!(
                        word_id = %word.id,
                        %chapter,
                        "word tagged with unusable chapter, reassigning"
                    );
                    word.chapter = None;
                }
            }
        }

        for level in HskLevel::ALL {
            let chapters = curriculum.learning_chapters(level);
            if chapters.is_empty() {
                continue;
            }
            let mut untagged: Vec<usize> = words
                .iter()
                .enumerate()
                .filter(|(_, w)| w.level == level && w.chapter.is_none())
                .map(|(idx, _)| idx)
                .collect();
            untagged.sort_by_key(|idx| words[*idx].frequency);

            let total = untagged.len();
            for (rank, idx) in untagged.into_iter().enumerate() {
                words[idx].chapter = Some(chapters[rank * chapters.len() / total]);
            }
        }

        let by_id = words
            .iter()
            .enumerate()
            .map(|(idx, w)| (w.id.clone(), idx))
            .collect();

        let mut by_chapter: BTreeMap<ChapterId, Vec<usize>> = BTreeMap::new();
        for (idx, word) in words.iter().enumerate() {
            if let Some(chapter) = word.chapter {
                by_chapter.entry(chapter).or_default().push(idx);
            }
        }

        Self {
            words,
            by_id,
            by_chapter,
        }
    }

    pub fn words(&self) -> &[VocabularyWord] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&VocabularyWord> {
        self.by_id.get(id).map(|idx| &self.words[*idx])
    }

    pub fn for_level(&self, level: HskLevel) -> impl Iterator<Item = &VocabularyWord> {
        self.words.iter().filter(move |w| w.level == level)
    }

    pub fn for_levels<'a>(
        &'a self,
        levels: &'a BTreeSet<HskLevel>,
    ) -> impl Iterator<Item = &'a VocabularyWord> {
        self.words.iter().filter(move |w| levels.contains(&w.level))
    }

    pub fn for_chapter(&self, chapter: ChapterId) -> impl Iterator<Item = &VocabularyWord> {
        self.by_chapter
            .get(&chapter)
            .into_iter()
            .flatten()
            .map(|idx| &self.words[*idx])
    }

    pub fn chapter_word_count(&self, chapter: ChapterId) -> usize {
        self.by_chapter.get(&chapter).map_or(0, Vec::len)
    }

    pub fn chapter_of(&self, word_id: &str) -> Option<ChapterId> {
        self.get(word_id).and_then(|w| w.chapter)
    }

    /// Words of a level the learner has answered at least once.
    pub fn count_seen_in_level(&self, level: HskLevel, ledger: &ProgressLedger) -> usize {
        self.for_level(level)
            .filter(|w| ledger.has_seen(&w.id))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"[
        {"s":"爱","r":"爫","q":3,"p":["v"],"f":[{"t":"愛","i":{"y":"ài","n":"ai4"},"m":["to love"],"c":[]}]},
        {"s":"八","r":"八","q":1,"p":["num"],"f":[{"t":"八","i":{"y":"bā","n":"ba1"},"m":["eight"]}]},
        {"s":"还","r":"辶","q":2,"p":["adv"],"f":[
            {"t":"還","i":{"y":"hái","n":"hai2"},"m":["still"]},
            {"t":"還","i":{"y":"huán","n":"huan2"},"m":["to return"]},
            {"t":"還","i":{"y":"hái","n":"hai2"},"m":["yet"]}
        ]},
        {"s":"啊","q":9,"f":[]}
    ]"#;

    #[test]
    fn test_parse_short_keys() {
        let words = parse_hsk_list(HskLevel::Hsk1, SAMPLE).unwrap();
        assert_eq!(words.len(), 4);
        assert_eq!(words[0].id, "爱");
        assert_eq!(words[0].traditional, "愛");
        assert_eq!(words[0].pronunciations, vec![Pronunciation::new("ài", "ai4")]);
        assert_eq!(words[0].meanings, vec!["to love".to_string()]);
        assert_eq!(words[2].pronunciations.len(), 2);
        assert!(words[3].pronunciations.is_empty());
        assert_eq!(words[3].traditional, "啊");
    }

    #[test]
    fn test_parse_long_keys() {
        let json = r#"[{"simplified":"你","frequency":4,"forms":[{"traditional":"你",
            "transcriptions":{"pinyin":"nǐ","numeric":"ni3","wade-giles":"ni3"},"meanings":["you"]}]}]"#;
        let words = parse_hsk_list(HskLevel::Hsk2, json).unwrap();
        assert_eq!(words[0].level, HskLevel::Hsk2);
        assert_eq!(words[0].frequency, 4);
        assert_eq!(words[0].pinyin(), "nǐ");
        assert_eq!(words[0].pinyin_numeric(), "ni3");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let result = parse_hsk_list(HskLevel::Hsk3, "{not json");
        assert!(matches!(result, Err(VocabularyError::Json { level: 3, .. })));
    }

    #[test]
    fn test_chapters_assigned_by_frequency() {
        let curriculum = Curriculum::hsk();
        let words = parse_hsk_list(HskLevel::Hsk1, SAMPLE).unwrap();
        let vocabulary = Vocabulary::new(words, &curriculum);

        // 4 words over 14 learning chapters: each lands in its own chapter, in frequency order
        assert_eq!(vocabulary.chapter_of("八"), Some(ChapterId::new(HskLevel::Hsk1, 1)));
        assert_eq!(vocabulary.chapter_of("还"), Some(ChapterId::new(HskLevel::Hsk1, 4)));
        assert_eq!(vocabulary.chapter_of("爱"), Some(ChapterId::new(HskLevel::Hsk1, 8)));
        assert_eq!(vocabulary.chapter_of("啊"), Some(ChapterId::new(HskLevel::Hsk1, 11)));
        assert_eq!(vocabulary.chapter_word_count(ChapterId::new(HskLevel::Hsk1, 15)), 0);
    }

    #[test]
    fn test_every_word_gets_a_learning_chapter() {
        let curriculum = Curriculum::hsk();
        let words: Vec<VocabularyWord> = (0..100)
            .map(|i| VocabularyWord {
                id: format!("w{i}"),
                simplified: format!("w{i}"),
                traditional: format!("w{i}"),
                level: HskLevel::Hsk2,
                chapter: None,
                frequency: i,
                meanings: vec![],
                pronunciations: vec![Pronunciation::numeric_only("a1")],
            })
            .collect();
        let vocabulary = Vocabulary::new(words, &curriculum);

        let counts: Vec<usize> = curriculum
            .learning_chapters(HskLevel::Hsk2)
            .into_iter()
            .map(|c| vocabulary.chapter_word_count(c))
            .collect();
        assert_eq!(counts.iter().sum::<usize>(), 100);
        assert!(counts.iter().all(|c| (8..=9).contains(c)), "{counts:?}");
        assert!(vocabulary
            .words()
            .iter()
            .all(|w| !curriculum.is_review(w.chapter.unwrap())));
    }

    #[test]
    fn test_duplicates_dropped_and_bad_tags_reassigned() {
        let curriculum = Curriculum::hsk();
        let mut words = parse_hsk_list(HskLevel::Hsk1, SAMPLE).unwrap();
        let mut dup = words[0].clone();
        dup.meanings = vec!["duplicate".into()];
        words.push(dup);
        words[1].chapter = Some(ChapterId::new(HskLevel::Hsk1, 15));

        let vocabulary = Vocabulary::new(words, &curriculum);
        assert_eq!(vocabulary.len(), 4);
        assert_eq!(vocabulary.get("爱").unwrap().meanings, vec!["to love".to_string()]);
        assert!(!curriculum.is_review(vocabulary.chapter_of("八").unwrap()));
    }
}
