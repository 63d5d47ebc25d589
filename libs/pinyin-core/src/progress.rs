//! Progress ledger: per-word outcomes, streaks and chapter completion.
//!
//! The ledger is the only durable, mutated state. Every change goes through
//! the methods here so the review queue (`incorrect_word_ids`) always
//! reflects each word's most recent outcome.

use crate::curriculum::Curriculum;
use crate::types::{AnswerOutcome, ChapterId, WordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Percentage of the preceding chapter needed to unlock the next one.
pub const UNLOCK_THRESHOLD: f64 = 80.0;

/// Completion tracking for one chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterProgress {
    chapter_id: ChapterId,
    total_words: usize,
    words_completed_ids: BTreeSet<WordId>,
    is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    completion_timestamp: Option<DateTime<Utc>>,
    total_attempts: u32,
    correct_attempts: u32,
    /// Seconds.
    total_practice_time: f64,
}

impl ChapterProgress {
    pub fn new(chapter_id: ChapterId, total_words: usize) -> Self {
        Self {
            chapter_id,
            total_words,
            words_completed_ids: BTreeSet::new(),
            is_completed: false,
            completion_timestamp: None,
            total_attempts: 0,
            correct_attempts: 0,
            total_practice_time: 0.0,
        }
    }

    pub fn chapter_id(&self) -> ChapterId {
        self.chapter_id
    }

    pub fn total_words(&self) -> usize {
        self.total_words
    }

    pub fn words_completed_ids(&self) -> &BTreeSet<WordId> {
        &self.words_completed_ids
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn completion_timestamp(&self) -> Option<DateTime<Utc>> {
        self.completion_timestamp
    }

    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    pub fn correct_attempts(&self) -> u32 {
        self.correct_attempts
    }

    pub fn total_practice_time(&self) -> f64 {
        self.total_practice_time
    }

    pub fn completion_percentage(&self) -> f64 {
        if self.total_words == 0 {
            return 0.0;
        }
        self.words_completed_ids.len() as f64 / self.total_words as f64 * 100.0
    }

    /// None until the chapter has been attempted.
    pub fn accuracy(&self) -> Option<f64> {
        if self.total_attempts == 0 {
            return None;
        }
        Some(self.correct_attempts as f64 / self.total_attempts as f64 * 100.0)
    }

    /// Returns true only on the transition to completed.
    fn mark_word_completed(&mut self, word_id: &str, now: DateTime<Utc>) -> bool {
        self.words_completed_ids.insert(word_id.to_string());
        if !self.is_completed && self.words_completed_ids.len() == self.total_words {
            self.is_completed = true;
            self.completion_timestamp = Some(now);
            return true;
        }
        false
    }
}

/// Summary numbers for progress displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub words_seen: usize,
    pub correct_answers: u32,
    pub total_attempts: u32,
    pub accuracy: f64,
    pub current_streak: u32,
    pub best_streak: u32,
    pub review_count: usize,
    pub chapters_completed: usize,
}

/// Durable learner progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressLedger {
    seen_word_ids: BTreeSet<WordId>,
    incorrect_word_ids: BTreeSet<WordId>,
    correct_answers: u32,
    total_attempts: u32,
    current_streak: u32,
    best_streak: u32,
    chapter_progress: BTreeMap<ChapterId, ChapterProgress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_seen_word_id: Option<WordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_practice_at: Option<DateTime<Utc>>,
}

impl ProgressLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen_word_ids(&self) -> &BTreeSet<WordId> {
        &self.seen_word_ids
    }

    /// The review queue.
    pub fn incorrect_word_ids(&self) -> &BTreeSet<WordId> {
        &self.incorrect_word_ids
    }

    pub fn words_seen_count(&self) -> usize {
        self.seen_word_ids.len()
    }

    pub fn has_seen(&self, word_id: &str) -> bool {
        self.seen_word_ids.contains(word_id)
    }

    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn last_seen_word_id(&self) -> Option<&str> {
        self.last_seen_word_id.as_deref()
    }

    pub fn last_practice_at(&self) -> Option<DateTime<Utc>> {
        self.last_practice_at
    }

    /// Lifetime accuracy in percent, 0 before the first attempt.
    pub fn accuracy(&self) -> f64 {
        if self.total_attempts == 0 {
            return 0.0;
        }
        self.correct_answers as f64 / self.total_attempts as f64 * 100.0
    }

    pub fn has_incorrect_words(&self) -> bool {
        !self.incorrect_word_ids.is_empty()
    }

    pub fn can_practice_review(&self) -> bool {
        self.has_incorrect_words()
    }

    pub fn chapter_progress(&self, chapter: ChapterId) -> Option<&ChapterProgress> {
        self.chapter_progress.get(&chapter)
    }

    pub fn all_chapter_progress(&self) -> impl Iterator<Item = &ChapterProgress> {
        self.chapter_progress.values()
    }

    /// Record one answer.
    pub fn record_answer(&mut self, word_id: &str, outcome: AnswerOutcome) {
        self.record_answer_at(word_id, outcome, Utc::now());
    }

    pub fn record_answer_at(&mut self, word_id: &str, outcome: AnswerOutcome, now: DateTime<Utc>) {
        self.total_attempts += 1;
        self.seen_word_ids.insert(word_id.to_string());
        self.last_seen_word_id = Some(word_id.to_string());
        self.last_practice_at = Some(now);

        if outcome.is_correct() {
            self.correct_answers += 1;
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
            self.incorrect_word_ids.remove(word_id);
        } else {
            self.current_streak = 0;
            self.incorrect_word_ids.insert(word_id.to_string());
        }
    }

    /// Mark a word of a chapter as completed.
    ///
    /// Returns true exactly once per chapter: on the call that completes it.
    pub fn update_chapter_progress(
        &mut self,
        chapter: ChapterId,
        word_id: &str,
        total_words: usize,
    ) -> bool {
        self.update_chapter_progress_at(chapter, word_id, total_words, Utc::now())
    }

    pub fn update_chapter_progress_at(
        &mut self,
        chapter: ChapterId,
        word_id: &str,
        total_words: usize,
        now: DateTime<Utc>,
    ) -> bool {
        self.chapter_entry(chapter, total_words)
            .mark_word_completed(word_id, now)
    }

    /// Count an attempt against a chapter.
    pub fn record_chapter_attempt(
        &mut self,
        chapter: ChapterId,
        total_words: usize,
        correct: bool,
    ) {
        let progress = self.chapter_entry(chapter, total_words);
        progress.total_attempts += 1;
        if correct {
            progress.correct_attempts += 1;
        }
    }

    /// Add practice time (seconds) to a chapter already being tracked.
    pub fn add_chapter_practice_time(&mut self, chapter: ChapterId, seconds: f64) {
        if let Some(progress) = self.chapter_progress.get_mut(&chapter) {
            progress.total_practice_time += seconds.max(0.0);
        }
    }

    fn chapter_entry(&mut self, chapter: ChapterId, total_words: usize) -> &mut ChapterProgress {
        self.chapter_progress
            .entry(chapter)
            .or_insert_with(|| ChapterProgress::new(chapter, total_words))
    }

    /// Whether a chapter may be selected for practice.
    ///
    /// The first chapter of a level is always open, review chapters never
    /// are, and any other chapter opens once the nearest earlier non-review
    /// chapter is at least 80% complete.
    pub fn is_chapter_unlocked(&self, curriculum: &Curriculum, chapter: ChapterId) -> bool {
        let Some(info) = curriculum.chapter(chapter) else {
            return false;
        };
        if curriculum.first_of_level(chapter.level) == Some(chapter) {
            return true;
        }
        if info.is_review {
            return false;
        }
        match curriculum.preceding_non_review(chapter) {
            Some(previous) => self
                .chapter_progress
                .get(&previous)
                .is_some_and(|p| p.completion_percentage() >= UNLOCK_THRESHOLD),
            None => true,
        }
    }

    pub fn stats(&self) -> ProgressStats {
        ProgressStats {
            words_seen: self.words_seen_count(),
            correct_answers: self.correct_answers,
            total_attempts: self.total_attempts,
            accuracy: self.accuracy(),
            current_streak: self.current_streak,
            best_streak: self.best_streak,
            review_count: self.incorrect_word_ids.len(),
            chapters_completed: self
                .chapter_progress
                .values()
                .filter(|p| p.is_completed)
                .count(),
        }
    }

    /// Wipe all progress.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
