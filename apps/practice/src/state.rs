//! Application state.

use crate::db::{
    DbError, ProgressRepository, SessionRepository, SettingsRepository, SqliteRepository,
};
use crate::debounce::AutoCheck;
use pinyin_core::{
    Curriculum, EventSink, PracticeContext, PracticeEvent, PracticeSession, PracticeSettings,
    ProgressLedger, SessionRecord, Vocabulary, WordId,
};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

const EVENT_CAPACITY: usize = 64;

/// Learner data loaded at startup and mutated by commands.
#[derive(Debug, Default)]
pub struct PracticeStore {
    pub ledger: ProgressLedger,
    pub settings: PracticeSettings,
    pub sessions: Vec<SessionRecord>,
    pub session: Option<PracticeSession>,
}

impl PracticeStore {
    /// Split borrow of the active session and a context over the ledger.
    pub fn session_parts<'a>(
        &'a mut self,
        vocabulary: &'a Vocabulary,
        curriculum: &'a Curriculum,
    ) -> Option<(&'a mut PracticeSession, PracticeContext<'a>)> {
        let session = self.session.as_mut()?;
        let ctx = PracticeContext {
            vocabulary,
            curriculum,
            ledger: &mut self.ledger,
        };
        Some((session, ctx))
    }
}

/// Typed input captured by the auto-check, tied to the word it was typed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoCheckRequest {
    pub word_id: WordId,
    pub position: usize,
    pub input: String,
}

/// Forwards core events to broadcast subscribers.
pub struct BroadcastSink<'a>(pub &'a broadcast::Sender<PracticeEvent>);

impl EventSink for BroadcastSink<'_> {
    fn emit(&mut self, event: PracticeEvent) {
        // no subscribers is fine
        let _ = self.0.send(event);
    }
}

/// Global application state.
pub struct AppState {
    pub repository: Arc<Mutex<SqliteRepository>>,
    pub vocabulary: Arc<Vocabulary>,
    pub curriculum: Arc<Curriculum>,
    store: Mutex<PracticeStore>,
    events: broadcast::Sender<PracticeEvent>,
    auto_check: Mutex<AutoCheck<AutoCheckRequest>>,
    auto_check_rx: Mutex<Option<mpsc::UnboundedReceiver<AutoCheckRequest>>>,
}

impl AppState {
    /// Build state, reading the stored ledger, settings and history.
    ///
    /// Anything that cannot be read starts from its default.
    pub fn new(
        repository: SqliteRepository,
        vocabulary: Vocabulary,
        curriculum: Curriculum,
        auto_check_delay: Duration,
    ) -> Self {
        let store = PracticeStore {
            ledger: or_default(repository.load_progress(), "progress"),
            settings: or_default(repository.load_settings(), "settings"),
            sessions: or_default(repository.load_sessions(), "session history"),
            session: None,
        };
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            repository: Arc::new(Mutex::new(repository)),
            vocabulary: Arc::new(vocabulary),
            curriculum: Arc::new(curriculum),
            store: Mutex::new(store),
            events,
            auto_check: Mutex::new(AutoCheck::new(auto_check_delay, tx)),
            auto_check_rx: Mutex::new(Some(rx)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PracticeEvent> {
        self.events.subscribe()
    }

    pub fn sink(&self) -> BroadcastSink<'_> {
        BroadcastSink(&self.events)
    }

    pub fn store(&self) -> MutexGuard<'_, PracticeStore> {
        lock(&self.store)
    }

    pub fn auto_check(&self) -> MutexGuard<'_, AutoCheck<AutoCheckRequest>> {
        lock(&self.auto_check)
    }

    /// Receiver of auto-check submissions. Can be taken once.
    pub fn take_auto_check_receiver(
        &self,
    ) -> Option<mpsc::UnboundedReceiver<AutoCheckRequest>> {
        lock(&self.auto_check_rx).take()
    }

    pub fn persist_progress(&self, ledger: &ProgressLedger) {
        if let Err(e) = lock(&self.repository).save_progress(ledger) {
            tracing::error!(error = %e, "failed to save progress");
        }
    }

    pub fn persist_settings(&self, settings: &PracticeSettings) {
        if let Err(e) = lock(&self.repository).save_settings(settings) {
            tracing::error!(error = %e, "failed to save settings");
        }
    }

    pub fn persist_sessions(&self, sessions: &[SessionRecord]) {
        if let Err(e) = lock(&self.repository).save_sessions(sessions) {
            tracing::error!(error = %e, "failed to save session history");
        }
    }
}

fn or_default<T: Default>(loaded: Result<T, DbError>, what: &str) -> T {
    loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load {what}, starting fresh");
        T::default()
    })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
