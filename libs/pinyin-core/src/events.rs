//! Outbound practice events.
//!
//! State is mutated first, then the matching event is emitted to a sink.

use crate::matching::MatchResult;
use crate::progress::{ChapterProgress, ProgressStats};
use crate::session::SessionSummary;
use crate::types::{ChapterId, WordId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PracticeEvent {
    AnswerClassified { word_id: WordId, result: MatchResult },
    AnswerSkipped { word_id: WordId },
    ProgressUpdated { stats: ProgressStats },
    ChapterCompleted { chapter: ChapterId, progress: ChapterProgress },
    SessionCompleted { summary: SessionSummary },
}

/// Receiver of practice events.
pub trait EventSink {
    fn emit(&mut self, event: PracticeEvent);
}

impl EventSink for Vec<PracticeEvent> {
    fn emit(&mut self, event: PracticeEvent) {
        self.push(event);
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: PracticeEvent) {}
}
