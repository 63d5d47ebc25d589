//! Commands exposed to a UI host.
//!
//! Each command locks the shared store, calls into `pinyin-core`, writes
//! changed state through to SQLite and returns a serializable response.

pub mod chapters;
pub mod settings;
pub mod stats;
pub mod study;

use pinyin_core::ChapterIdError;
use serde::{Serialize, Serializer};
use thiserror::Error;

pub use chapters::{get_chapter_progress, list_chapters, ChapterView};
pub use settings::{cleanup_selected_chapters, get_settings, save_settings};
pub use stats::{
    accuracy_trend, get_progress_stats, reset_progress, sessions_in_range,
    words_learned_for_level, DailyAccuracy, LevelProgress,
};
pub use study::{
    current_word, input_changed, next_word, skip_word, start_session, submit_answer,
    submit_auto_check, try_again, SessionStatus, WordPrompt,
};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Db(#[from] crate::db::DbError),

    #[error("no practice session in progress")]
    NoSession,

    #[error("unknown word: {0}")]
    UnknownWord(String),

    #[error(transparent)]
    InvalidChapter(#[from] ChapterIdError),
}

impl Serialize for CommandError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
