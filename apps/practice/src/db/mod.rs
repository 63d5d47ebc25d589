//! Local SQLite persistence for progress, settings and session history.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{
    ProgressRepository, SessionRepository, SettingsRepository, SqliteRepository, PROGRESS_KEY,
    SESSIONS_KEY, SETTINGS_KEY,
};
