//! A single practice run over a built queue.
//!
//! The session owns only run-local state (position, feedback, session
//! counters). Durable progress lives in the [`ProgressLedger`] passed in
//! through [`PracticeContext`] on every call.

use crate::curriculum::Curriculum;
use crate::events::{EventSink, PracticeEvent};
use crate::matching::{classify_word, MatchResult};
use crate::progress::{ChapterProgress, ProgressLedger};
use crate::types::{AnswerOutcome, ChapterId, HskLevel, PracticeMode, PracticeSettings, WordId};
use crate::vocabulary::Vocabulary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Borrowed collaborators for session operations.
pub struct PracticeContext<'a> {
    pub vocabulary: &'a Vocabulary,
    pub curriculum: &'a Curriculum,
    pub ledger: &'a mut ProgressLedger,
}

/// Feedback shown for the current word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Pending,
    Correct,
    Partial,
    Incorrect,
    Skipped,
}

impl Default for Feedback {
    fn default() -> Self {
        Self::Pending
    }
}

impl From<AnswerOutcome> for Feedback {
    fn from(outcome: AnswerOutcome) -> Self {
        match outcome {
            AnswerOutcome::Correct => Self::Correct,
            AnswerOutcome::Partial => Self::Partial,
            AnswerOutcome::Incorrect => Self::Incorrect,
            AnswerOutcome::Skipped => Self::Skipped,
        }
    }
}

/// Totals for a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub mode: PracticeMode,
    pub levels: Vec<HskLevel>,
    pub chapters: Vec<ChapterId>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub words_studied: usize,
    pub correct_answers: u32,
    pub attempts: u32,
    pub accuracy: f64,
    /// Ledger streaks at the end of the session.
    pub current_streak: u32,
    pub best_streak: u32,
}

impl SessionSummary {
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            id: self.session_id,
            started_at: self.started_at,
            ended_at: self.ended_at,
            duration_secs: self.duration_secs,
            words_studied: self.words_studied,
            correct_answers: self.correct_answers,
            attempts: self.attempts,
            accuracy: self.accuracy,
            mode: self.mode,
            levels: self.levels.clone(),
            chapters: self.chapters.clone(),
        }
    }
}

/// Persisted history entry for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub words_studied: usize,
    pub correct_answers: u32,
    pub attempts: u32,
    pub accuracy: f64,
    pub mode: PracticeMode,
    #[serde(default)]
    pub levels: Vec<HskLevel>,
    #[serde(default)]
    pub chapters: Vec<ChapterId>,
}

/// How a session ended. Returned by the call that finished it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEnd {
    ChapterCompleted {
        chapter: ChapterId,
        progress: ChapterProgress,
        summary: SessionSummary,
    },
    Completed {
        summary: SessionSummary,
    },
}

impl SessionEnd {
    pub fn summary(&self) -> &SessionSummary {
        match self {
            Self::ChapterCompleted { summary, .. } | Self::Completed { summary } => summary,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PracticeSession {
    id: Uuid,
    mode: PracticeMode,
    require_tones: bool,
    levels: Vec<HskLevel>,
    selected_chapters: Vec<ChapterId>,
    queue: Vec<WordId>,
    index: usize,
    feedback: Feedback,
    started_at: DateTime<Utc>,
    words_studied: usize,
    correct_answers: u32,
    attempts: u32,
    practiced_chapters: BTreeSet<ChapterId>,
    newly_completed: Vec<ChapterId>,
    finished: bool,
}

impl PracticeSession {
    pub fn new(queue: Vec<WordId>, settings: &PracticeSettings, now: DateTime<Utc>) -> Self {
        let selected_chapters = match settings.practice_mode {
            PracticeMode::Chapter => settings.selected_chapters.iter().copied().collect(),
            _ => Vec::new(),
        };
        Self {
            id: Uuid::new_v4(),
            mode: settings.practice_mode,
            require_tones: settings.require_tones,
            levels: settings.selected_levels.iter().copied().collect(),
            selected_chapters,
            queue,
            index: 0,
            feedback: Feedback::Pending,
            started_at: now,
            words_studied: 0,
            correct_answers: 0,
            attempts: 0,
            practiced_chapters: BTreeSet::new(),
            newly_completed: Vec::new(),
            finished: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    pub fn require_tones(&self) -> bool {
        self.require_tones
    }

    pub fn queue(&self) -> &[WordId] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Zero-based index of the current word.
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn words_studied(&self) -> usize {
        self.words_studied
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn current_word_id(&self) -> Option<&str> {
        if self.finished {
            return None;
        }
        self.queue.get(self.index).map(String::as_str)
    }

    /// Check typed pinyin against the current word.
    ///
    /// Returns `None` when there is no current word or it has already been
    /// answered correctly.
    pub fn submit(
        &mut self,
        ctx: &mut PracticeContext<'_>,
        input: &str,
        sink: &mut impl EventSink,
    ) -> Option<MatchResult> {
        if self.feedback == Feedback::Correct {
            return None;
        }
        let word_id = self.current_word_id()?.to_string();
        let vocabulary = ctx.vocabulary;
        let Some(word) = vocabulary.get(&word_id) else {
            tracing::warn!(%word_id, "queued word missing from vocabulary");
            return None;
        };

        let result = classify_word(word, input, self.require_tones);
        let outcome = AnswerOutcome::from(result.outcome);
        self.record(ctx, &word_id, word.chapter, outcome);

        sink.emit(PracticeEvent::AnswerClassified {
            word_id,
            result: result.clone(),
        });
        sink.emit(PracticeEvent::ProgressUpdated {
            stats: ctx.ledger.stats(),
        });
        Some(result)
    }

    /// Give up on the current word. Returns false if there was nothing to skip.
    pub fn skip(&mut self, ctx: &mut PracticeContext<'_>, sink: &mut impl EventSink) -> bool {
        if self.feedback == Feedback::Correct {
            return false;
        }
        let Some(word_id) = self.current_word_id().map(str::to_string) else {
            return false;
        };
        let chapter = ctx.vocabulary.chapter_of(&word_id);
        self.record(ctx, &word_id, chapter, AnswerOutcome::Skipped);

        sink.emit(PracticeEvent::AnswerSkipped { word_id });
        sink.emit(PracticeEvent::ProgressUpdated {
            stats: ctx.ledger.stats(),
        });
        true
    }

    /// Clear feedback so the current word can be answered again.
    pub fn try_again(&mut self) {
        if self.feedback != Feedback::Correct {
            self.feedback = Feedback::Pending;
        }
    }

    /// Move to the next word, finishing the session when the queue runs out.
    pub fn advance(
        &mut self,
        ctx: &mut PracticeContext<'_>,
        sink: &mut impl EventSink,
        now: DateTime<Utc>,
    ) -> Option<SessionEnd> {
        if self.finished || self.queue.is_empty() {
            return None;
        }
        self.words_studied += 1;
        self.index += 1;
        self.feedback = Feedback::Pending;
        if self.index < self.queue.len() {
            return None;
        }
        Some(self.finish(ctx, sink, now))
    }

    fn record(
        &mut self,
        ctx: &mut PracticeContext<'_>,
        word_id: &str,
        chapter: Option<ChapterId>,
        outcome: AnswerOutcome,
    ) {
        ctx.ledger.record_answer(word_id, outcome);
        self.attempts += 1;
        if outcome.is_correct() {
            self.correct_answers += 1;
        }
        self.feedback = outcome.into();

        if self.mode != PracticeMode::Chapter {
            return;
        }
        let Some(chapter) = chapter else { return };
        let total = ctx.vocabulary.chapter_word_count(chapter);
        self.practiced_chapters.insert(chapter);
        ctx.ledger
            .record_chapter_attempt(chapter, total, outcome.is_correct());
        if outcome.is_correct() && ctx.ledger.update_chapter_progress(chapter, word_id, total) {
            tracing::info!(%chapter, "chapter completed");
            self.newly_completed.push(chapter);
        }
    }

    fn finish(
        &mut self,
        ctx: &mut PracticeContext<'_>,
        sink: &mut impl EventSink,
        now: DateTime<Utc>,
    ) -> SessionEnd {
        self.finished = true;

        let duration_secs = (now - self.started_at).num_milliseconds().max(0) as f64 / 1000.0;
        if !self.practiced_chapters.is_empty() {
            let share = duration_secs / self.practiced_chapters.len() as f64;
            for chapter in &self.practiced_chapters {
                ctx.ledger.add_chapter_practice_time(*chapter, share);
            }
        }

        let accuracy = if self.attempts == 0 {
            0.0
        } else {
            self.correct_answers as f64 / self.attempts as f64 * 100.0
        };
        let summary = SessionSummary {
            session_id: self.id,
            mode: self.mode,
            levels: self.levels.clone(),
            chapters: self.selected_chapters.clone(),
            started_at: self.started_at,
            ended_at: now,
            duration_secs,
            words_studied: self.words_studied,
            correct_answers: self.correct_answers,
            attempts: self.attempts,
            accuracy,
            current_streak: ctx.ledger.current_streak(),
            best_streak: ctx.ledger.best_streak(),
        };
        tracing::info!(
            session_id = %self.id,
            words = summary.words_studied,
            accuracy = summary.accuracy,
            "practice session finished"
        );

        let completed = self
            .newly_completed
            .iter()
            .copied()
            .min_by_key(|c| ctx.curriculum.position(*c).unwrap_or(usize::MAX))
            .and_then(|c| ctx.ledger.chapter_progress(c).map(|p| (c, p.clone())));

        match completed {
            Some((chapter, progress)) => {
                sink.emit(PracticeEvent::ChapterCompleted {
                    chapter,
                    progress: progress.clone(),
                });
                SessionEnd::ChapterCompleted {
                    chapter,
                    progress,
                    summary,
                }
            }
            None => {
                sink.emit(PracticeEvent::SessionCompleted {
                    summary: summary.clone(),
                });
                SessionEnd::Completed { summary }
            }
        }
    }
}
