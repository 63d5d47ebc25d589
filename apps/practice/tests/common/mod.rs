//! Common test utilities for integration tests.
//!
//! - TestContext builds an `AppState` over an in-memory or on-disk database
//! - Helpers to drain broadcast events and change settings

pub mod fixtures;

use pinyin_core::{ChapterId, Curriculum, PracticeEvent, PracticeMode, PracticeSettings};
use pinyin_practice::commands;
use pinyin_practice::db::SqliteRepository;
use pinyin_practice::state::AppState;
use std::path::Path;
use std::time::Duration;
use tokio::sync::broadcast;

pub const AUTO_CHECK_DELAY: Duration = Duration::from_millis(500);

pub struct TestContext {
    pub state: AppState,
    pub events: broadcast::Receiver<PracticeEvent>,
}

impl TestContext {
    /// Fresh in-memory database.
    pub fn new() -> Self {
        Self::with_repository(SqliteRepository::open_in_memory().expect("in-memory database"))
    }

    /// Database file at `path`, created if missing.
    pub fn open(path: &Path) -> Self {
        Self::with_repository(SqliteRepository::open(path).expect("database file"))
    }

    fn with_repository(repository: SqliteRepository) -> Self {
        let curriculum = Curriculum::hsk();
        let vocabulary = fixtures::vocabulary(&curriculum);
        let state = AppState::new(repository, vocabulary, curriculum, AUTO_CHECK_DELAY);
        let events = state.subscribe();
        Self { state, events }
    }

    pub fn set_mode(&self, mode: PracticeMode, chapters: &[ChapterId], require_tones: bool) {
        let settings = PracticeSettings {
            practice_mode: mode,
            require_tones,
            selected_chapters: chapters.iter().copied().collect(),
            ..PracticeSettings::default()
        };
        commands::save_settings(&self.state, settings).expect("settings saved");
    }

    /// Current word id of the active session.
    pub fn current_id(&self) -> String {
        commands::current_word(&self.state)
            .expect("session active")
            .expect("word available")
            .word_id
    }

    pub fn drain_events(&mut self) -> Vec<PracticeEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

pub fn is_completion(event: &PracticeEvent) -> bool {
    matches!(
        event,
        PracticeEvent::ChapterCompleted { .. } | PracticeEvent::SessionCompleted { .. }
    )
}
