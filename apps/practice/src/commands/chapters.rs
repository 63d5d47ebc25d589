//! Chapter listing commands.

use super::CommandError;
use crate::state::AppState;
use pinyin_core::{ChapterId, ChapterProgress, HskLevel};
use serde::Serialize;

/// A curriculum chapter with the learner's state for it.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterView {
    pub id: ChapterId,
    pub title: String,
    pub description: String,
    pub is_review: bool,
    pub is_unlocked: bool,
    pub word_count: usize,
    pub completion_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ChapterProgress>,
}

/// List chapters in curriculum order, optionally for one level.
pub fn list_chapters(
    state: &AppState,
    level: Option<HskLevel>,
) -> Result<Vec<ChapterView>, CommandError> {
    let store = state.store();
    let views = state
        .curriculum
        .chapters()
        .iter()
        .filter(|info| level.map_or(true, |l| info.id.level == l))
        .map(|info| {
            let progress = store.ledger.chapter_progress(info.id).cloned();
            ChapterView {
                id: info.id,
                title: info.display_title(),
                description: info.description.clone(),
                is_review: info.is_review,
                is_unlocked: store.ledger.is_chapter_unlocked(&state.curriculum, info.id),
                word_count: state.vocabulary.chapter_word_count(info.id),
                completion_percentage: progress
                    .as_ref()
                    .map_or(0.0, ChapterProgress::completion_percentage),
                progress,
            }
        })
        .collect();
    Ok(views)
}

/// Progress for one chapter, `None` if it has never been practiced.
pub fn get_chapter_progress(
    state: &AppState,
    chapter: &str,
) -> Result<Option<ChapterProgress>, CommandError> {
    let id: ChapterId = chapter.parse()?;
    Ok(state.store().ledger.chapter_progress(id).cloned())
}
