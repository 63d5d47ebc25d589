//! Core types for pinyin practice.

use crate::curriculum::Curriculum;
use crate::error::ChapterIdError;
use crate::progress::ProgressLedger;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Stable key of a vocabulary word.
pub type WordId = String;

/// HSK proficiency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HskLevel {
    Hsk1 = 1,
    Hsk2 = 2,
    Hsk3 = 3,
    Hsk4 = 4,
    Hsk5 = 5,
    Hsk6 = 6,
}

impl HskLevel {
    pub const ALL: [HskLevel; 6] = [
        Self::Hsk1,
        Self::Hsk2,
        Self::Hsk3,
        Self::Hsk4,
        Self::Hsk5,
        Self::Hsk6,
    ];

    /// Numeric level (1-6).
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Create from numeric level.
    pub fn from_number(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Hsk1),
            2 => Some(Self::Hsk2),
            3 => Some(Self::Hsk3),
            4 => Some(Self::Hsk4),
            5 => Some(Self::Hsk5),
            6 => Some(Self::Hsk6),
            _ => None,
        }
    }
}

impl TryFrom<u8> for HskLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or_else(|| format!("unknown HSK level {value}"))
    }
}

impl From<HskLevel> for u8 {
    fn from(level: HskLevel) -> Self {
        level.number()
    }
}

impl Default for HskLevel {
    fn default() -> Self {
        Self::Hsk1
    }
}

/// Chapter identifier: level plus 1-based chapter number within that level.
///
/// The only string form is `hsk{level}-{number}`, e.g. `hsk2-7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChapterId {
    pub level: HskLevel,
    pub number: u8,
}

impl ChapterId {
    pub fn new(level: HskLevel, number: u8) -> Self {
        Self { level, number }
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsk{}-{}", self.level.number(), self.number)
    }
}

impl FromStr for ChapterId {
    type Err = ChapterIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ChapterIdError::Malformed(s.to_string());

        let rest = s.strip_prefix("hsk").ok_or_else(malformed)?;
        let (level, number) = rest.split_once('-').ok_or_else(malformed)?;
        if level.is_empty()
            || number.is_empty()
            || !level.bytes().all(|b| b.is_ascii_digit())
            || !number.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let level = level
            .parse::<u8>()
            .ok()
            .and_then(HskLevel::from_number)
            .ok_or_else(|| ChapterIdError::UnknownLevel(s.to_string()))?;
        let number = number.parse::<u8>().map_err(|_| malformed())?;
        if number == 0 {
            return Err(ChapterIdError::ZeroChapter(s.to_string()));
        }

        Ok(Self { level, number })
    }
}

impl Serialize for ChapterId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChapterId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One accepted reading of a word, in diacritic and/or numeric-tone form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pronunciation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diacritic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<String>,
}

impl Pronunciation {
    pub fn new(diacritic: impl Into<String>, numeric: impl Into<String>) -> Self {
        Self {
            diacritic: Some(diacritic.into()),
            numeric: Some(numeric.into()),
        }
    }

    pub fn diacritic_only(diacritic: impl Into<String>) -> Self {
        Self {
            diacritic: Some(diacritic.into()),
            numeric: None,
        }
    }

    pub fn numeric_only(numeric: impl Into<String>) -> Self {
        Self {
            diacritic: None,
            numeric: Some(numeric.into()),
        }
    }

    /// Non-blank forms of this pronunciation.
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        self.diacritic
            .as_deref()
            .into_iter()
            .chain(self.numeric.as_deref())
            .filter(|form| !form.trim().is_empty())
    }

    pub fn is_usable(&self) -> bool {
        self.forms().next().is_some()
    }
}

/// A vocabulary entry. Loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyWord {
    pub id: WordId,
    pub simplified: String,
    pub traditional: String,
    pub level: HskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<ChapterId>,
    pub frequency: u32,
    #[serde(default)]
    pub meanings: Vec<String>,
    pub pronunciations: Vec<Pronunciation>,
}

impl VocabularyWord {
    /// Primary diacritic pinyin, for display and hints.
    pub fn pinyin(&self) -> &str {
        self.pronunciations
            .iter()
            .find_map(|p| p.diacritic.as_deref())
            .unwrap_or("")
    }

    /// Primary numeric pinyin.
    pub fn pinyin_numeric(&self) -> &str {
        self.pronunciations
            .iter()
            .find_map(|p| p.numeric.as_deref())
            .unwrap_or("")
    }

    pub fn has_pronunciation(&self) -> bool {
        self.pronunciations.iter().any(Pronunciation::is_usable)
    }
}

/// Result of comparing typed pinyin to a word's accepted pronunciations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Correct,
    /// Syllables right, tones wrong. Only reachable when tones are required.
    Partial,
    Incorrect,
}

/// Outcome recorded into the progress ledger for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Partial,
    Incorrect,
    /// Counts against the word like an incorrect answer.
    Skipped,
}

impl AnswerOutcome {
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

impl From<MatchOutcome> for AnswerOutcome {
    fn from(outcome: MatchOutcome) -> Self {
        match outcome {
            MatchOutcome::Correct => Self::Correct,
            MatchOutcome::Partial => Self::Partial,
            MatchOutcome::Incorrect => Self::Incorrect,
        }
    }
}

/// How the practice queue is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeMode {
    Sequential,
    Random,
    ReviewMistakes,
    Chapter,
}

impl Default for PracticeMode {
    fn default() -> Self {
        Self::Sequential
    }
}

impl PracticeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Random => "random",
            Self::ReviewMistakes => "review_mistakes",
            Self::Chapter => "chapter",
        }
    }
}

/// Practice configuration chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeSettings {
    pub practice_mode: PracticeMode,
    pub require_tones: bool,
    pub selected_levels: BTreeSet<HskLevel>,
    pub selected_chapters: BTreeSet<ChapterId>,
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            practice_mode: PracticeMode::default(),
            require_tones: true,
            selected_levels: BTreeSet::from([HskLevel::Hsk1]),
            selected_chapters: BTreeSet::new(),
        }
    }
}

impl PracticeSettings {
    /// Drop selected chapters that are unknown, review-only or still locked.
    /// Returns the chapters that were removed.
    pub fn retain_unlocked(
        &mut self,
        ledger: &ProgressLedger,
        curriculum: &Curriculum,
    ) -> Vec<ChapterId> {
        let (keep, dropped): (BTreeSet<_>, BTreeSet<_>) = self
            .selected_chapters
            .iter()
            .copied()
            .partition(|id| ledger.is_chapter_unlocked(curriculum, *id));
        self.selected_chapters = keep;
        dropped.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chapter_id_canonical_form() {
        let id = ChapterId::new(HskLevel::Hsk2, 7);
        assert_eq!(id.to_string(), "hsk2-7");
        assert_eq!("hsk2-7".parse::<ChapterId>().unwrap(), id);
    }

    #[test]
    fn test_chapter_id_rejects_other_formats() {
        let rejected = [
            "chapter1",
            "chapter_1",
            "hsk1_chapter1",
            "hsk1-",
            "hsk-1",
            "HSK1-1",
            "hsk1-+2",
        ];
        for raw in rejected {
            assert!(
                matches!(raw.parse::<ChapterId>(), Err(ChapterIdError::Malformed(_))),
                "{raw} should be malformed"
            );
        }
        assert!(matches!(
            "hsk9-1".parse::<ChapterId>(),
            Err(ChapterIdError::UnknownLevel(_))
        ));
        assert!(matches!(
            "hsk1-0".parse::<ChapterId>(),
            Err(ChapterIdError::ZeroChapter(_))
        ));
    }

    #[test]
    fn test_chapter_id_serializes_as_string_and_map_key() {
        let id = ChapterId::new(HskLevel::Hsk1, 3);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"hsk1-3\"");

        let map = std::collections::BTreeMap::from([(id, 5u32)]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"hsk1-3":5}"#);
        let back: std::collections::BTreeMap<ChapterId, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_level_serializes_as_number() {
        assert_eq!(serde_json::to_string(&HskLevel::Hsk4).unwrap(), "4");
        assert_eq!(serde_json::from_str::<HskLevel>("6").unwrap(), HskLevel::Hsk6);
        assert!(serde_json::from_str::<HskLevel>("7").is_err());
    }

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let settings: PracticeSettings =
            serde_json::from_str(r#"{"practice_mode":"review_mistakes"}"#).unwrap();
        assert_eq!(settings.practice_mode, PracticeMode::ReviewMistakes);
        assert!(settings.require_tones);
        assert_eq!(settings.selected_levels, BTreeSet::from([HskLevel::Hsk1]));
    }

    #[test]
    fn test_pronunciation_forms_skip_blank() {
        let p = Pronunciation {
            diacritic: Some("  ".into()),
            numeric: Some("ni3".into()),
        };
        assert_eq!(p.forms().collect::<Vec<_>>(), vec!["ni3"]);
        assert!(!Pronunciation::default().is_usable());
    }
}
