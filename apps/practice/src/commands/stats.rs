//! Statistics commands.

use super::CommandError;
use crate::db::{ProgressRepository, SessionRepository};
use crate::state::AppState;
use chrono::{Duration, NaiveDate, Utc};
use pinyin_core::{EventSink, HskLevel, PracticeEvent, ProgressStats, SessionRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Words answered at least once out of a level's total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelProgress {
    pub level: HskLevel,
    pub learned: usize,
    pub total: usize,
}

/// Answer accuracy aggregated over the sessions ended on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAccuracy {
    pub date: NaiveDate,
    pub sessions: usize,
    pub attempts: u32,
    pub correct_answers: u32,
    pub accuracy: f64,
}

pub fn get_progress_stats(state: &AppState) -> Result<ProgressStats, CommandError> {
    Ok(state.store().ledger.stats())
}

pub fn words_learned_for_level(
    state: &AppState,
    level: HskLevel,
) -> Result<LevelProgress, CommandError> {
    let store = state.store();
    Ok(LevelProgress {
        level,
        learned: state.vocabulary.count_seen_in_level(level, &store.ledger),
        total: state.vocabulary.for_level(level).count(),
    })
}

/// Sessions that ended within the last `days` days, oldest first.
pub fn sessions_in_range(state: &AppState, days: u32) -> Result<Vec<SessionRecord>, CommandError> {
    let since = Utc::now() - Duration::days(i64::from(days));
    let store = state.store();
    Ok(store
        .sessions
        .iter()
        .filter(|s| s.ended_at >= since)
        .cloned()
        .collect())
}

/// Per-day accuracy over the last `days` days. Days without sessions are omitted.
pub fn accuracy_trend(state: &AppState, days: u32) -> Result<Vec<DailyAccuracy>, CommandError> {
    let sessions = sessions_in_range(state, days)?;
    let mut by_day: BTreeMap<NaiveDate, (usize, u32, u32)> = BTreeMap::new();
    for session in &sessions {
        let entry = by_day.entry(session.ended_at.date_naive()).or_default();
        entry.0 += 1;
        entry.1 += session.attempts;
        entry.2 += session.correct_answers;
    }

    Ok(by_day
        .into_iter()
        .map(|(date, (sessions, attempts, correct_answers))| DailyAccuracy {
            date,
            sessions,
            attempts,
            correct_answers,
            accuracy: if attempts == 0 {
                0.0
            } else {
                correct_answers as f64 / attempts as f64 * 100.0
            },
        })
        .collect())
}

/// Wipe the ledger and session history, ending any active session.
pub fn reset_progress(state: &AppState) -> Result<ProgressStats, CommandError> {
    state.auto_check().cancel();
    let mut store = state.store();
    store.ledger.reset();
    store.sessions.clear();
    store.session = None;

    {
        let repo = state.repository.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        repo.save_progress(&store.ledger)?;
        repo.save_sessions(&store.sessions)?;
    }
    tracing::info!("progress reset");

    let stats = store.ledger.stats();
    state.sink().emit(PracticeEvent::ProgressUpdated {
        stats: stats.clone(),
    });
    Ok(stats)
}
