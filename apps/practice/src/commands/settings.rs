//! Settings commands.

use super::CommandError;
use crate::state::AppState;
use pinyin_core::{ChapterId, PracticeSettings};

pub fn get_settings(state: &AppState) -> Result<PracticeSettings, CommandError> {
    Ok(state.store().settings.clone())
}

/// Replace the practice settings. Takes effect on the next session.
pub fn save_settings(state: &AppState, settings: PracticeSettings) -> Result<(), CommandError> {
    let mut store = state.store();
    store.settings = settings;
    state.persist_settings(&store.settings);
    Ok(())
}

/// Drop selected chapters that are unknown, review-only or locked.
///
/// Returns the removed chapter ids.
pub fn cleanup_selected_chapters(state: &AppState) -> Result<Vec<ChapterId>, CommandError> {
    let mut store = state.store();
    let store = &mut *store;
    let removed = store
        .settings
        .retain_unlocked(&store.ledger, &state.curriculum);
    if !removed.is_empty() {
        tracing::info!(count = removed.len(), "removed unavailable chapters from selection");
        state.persist_settings(&store.settings);
    }
    Ok(removed)
}
