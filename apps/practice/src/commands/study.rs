//! Practice session commands.

use super::CommandError;
use crate::state::{AppState, AutoCheckRequest};
use chrono::Utc;
use pinyin_core::{
    build_queue, looks_complete, Feedback, MatchResult, PracticeMode, SessionEnd, WordId,
};
use serde::Serialize;

/// The word currently being practiced.
#[derive(Debug, Clone, Serialize)]
pub struct WordPrompt {
    pub word_id: WordId,
    pub simplified: String,
    pub traditional: String,
    pub meanings: Vec<String>,
    pub position: usize,
    pub total: usize,
    pub feedback: Feedback,
    /// Reference pinyin, revealed once the word has been answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinyin: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub mode: PracticeMode,
    pub total: usize,
    pub require_tones: bool,
}

/// Build a queue from the saved settings and start a new session.
pub fn start_session(state: &AppState) -> Result<SessionStatus, CommandError> {
    let mut store = state.store();
    let queue = build_queue(
        &state.vocabulary,
        &state.curriculum,
        &store.settings,
        &store.ledger,
        &mut rand::thread_rng(),
    );
    if queue.is_empty() {
        tracing::warn!(
            mode = store.settings.practice_mode.as_str(),
            "practice queue is empty"
        );
    }

    let session = pinyin_core::PracticeSession::new(queue, &store.settings, Utc::now());
    tracing::info!(
        session_id = %session.id(),
        words = session.len(),
        "practice session started"
    );
    let status = SessionStatus {
        mode: session.mode(),
        total: session.len(),
        require_tones: session.require_tones(),
    };
    store.session = Some(session);
    state.auto_check().cancel();
    Ok(status)
}

pub fn current_word(state: &AppState) -> Result<Option<WordPrompt>, CommandError> {
    let store = state.store();
    let session = store.session.as_ref().ok_or(CommandError::NoSession)?;
    let Some(word_id) = session.current_word_id() else {
        return Ok(None);
    };
    let word = state
        .vocabulary
        .get(word_id)
        .ok_or_else(|| CommandError::UnknownWord(word_id.to_string()))?;

    let feedback = session.feedback();
    Ok(Some(WordPrompt {
        word_id: word.id.clone(),
        simplified: word.simplified.clone(),
        traditional: word.traditional.clone(),
        meanings: word.meanings.clone(),
        position: session.position(),
        total: session.len(),
        feedback,
        pinyin: (feedback != Feedback::Pending).then(|| word.pinyin().to_string()),
    }))
}

/// Check typed pinyin against the current word.
///
/// Returns `None` if the word was already answered correctly.
pub fn submit_answer(state: &AppState, input: &str) -> Result<Option<MatchResult>, CommandError> {
    state.auto_check().cancel();
    let mut store = state.store();
    let (session, mut ctx) = store
        .session_parts(&state.vocabulary, &state.curriculum)
        .ok_or(CommandError::NoSession)?;

    let result = session.submit(&mut ctx, input, &mut state.sink());
    if result.is_some() {
        state.persist_progress(&store.ledger);
    }
    Ok(result)
}

/// Submit input delivered by the auto-check receiver.
///
/// Input typed for a word that is no longer current is dropped and
/// returns `None`.
pub fn submit_auto_check(
    state: &AppState,
    request: &AutoCheckRequest,
) -> Result<Option<MatchResult>, CommandError> {
    state.auto_check().cancel();
    let mut store = state.store();
    let (session, mut ctx) = store
        .session_parts(&state.vocabulary, &state.curriculum)
        .ok_or(CommandError::NoSession)?;

    let still_current = session.current_word_id() == Some(request.word_id.as_str())
        && session.position() == request.position;
    if !still_current {
        tracing::debug!(
            word_id = %request.word_id,
            position = request.position,
            "dropping auto-check for a word no longer shown"
        );
        return Ok(None);
    }

    let result = session.submit(&mut ctx, &request.input, &mut state.sink());
    if result.is_some() {
        state.persist_progress(&store.ledger);
    }
    Ok(result)
}

pub fn skip_word(state: &AppState) -> Result<bool, CommandError> {
    state.auto_check().cancel();
    let mut store = state.store();
    let (session, mut ctx) = store
        .session_parts(&state.vocabulary, &state.curriculum)
        .ok_or(CommandError::NoSession)?;

    let skipped = session.skip(&mut ctx, &mut state.sink());
    if skipped {
        state.persist_progress(&store.ledger);
    }
    Ok(skipped)
}

pub fn try_again(state: &AppState) -> Result<(), CommandError> {
    let mut store = state.store();
    let session = store.session.as_mut().ok_or(CommandError::NoSession)?;
    session.try_again();
    Ok(())
}

/// Move on. Returns how the session ended when this was the last word.
pub fn next_word(state: &AppState) -> Result<Option<SessionEnd>, CommandError> {
    state.auto_check().cancel();
    let mut store = state.store();
    let (session, mut ctx) = store
        .session_parts(&state.vocabulary, &state.curriculum)
        .ok_or(CommandError::NoSession)?;

    let end = session.advance(&mut ctx, &mut state.sink(), Utc::now());
    if let Some(end) = &end {
        store.sessions.push(end.summary().to_record());
        state.persist_progress(&store.ledger);
        state.persist_sessions(&store.sessions);
    }
    Ok(end)
}

/// Called on every edit of the answer field.
///
/// When tones are optional and the input already looks complete, a check
/// is scheduled after the configured delay. Returns whether one was.
pub fn input_changed(state: &AppState, input: &str) -> Result<bool, CommandError> {
    let store = state.store();
    let session = store.session.as_ref().ok_or(CommandError::NoSession)?;

    let mut auto_check = state.auto_check();
    auto_check.cancel();
    if session.require_tones() || session.feedback() == Feedback::Correct {
        return Ok(false);
    }
    let Some(word) = session
        .current_word_id()
        .and_then(|id| state.vocabulary.get(id))
    else {
        return Ok(false);
    };
    if !looks_complete(input, word, false) {
        return Ok(false);
    }
    Ok(auto_check.schedule(AutoCheckRequest {
        word_id: word.id.clone(),
        position: session.position(),
        input: input.to_string(),
    }))
}
