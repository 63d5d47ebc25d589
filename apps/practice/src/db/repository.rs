//! Repository pattern for database access.
//!
//! Every durable value is one JSON blob in `kv_store`. Blobs are read once
//! at startup and rewritten whole after each change.

use crate::db::error::DbError;
use crate::db::schema::{SCHEMA, SCHEMA_VERSION};
use chrono::Utc;
use pinyin_core::{PracticeSettings, ProgressLedger, SessionRecord};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

pub const PROGRESS_KEY: &str = "UserProgress";
pub const SETTINGS_KEY: &str = "PracticeSettings";
pub const SESSIONS_KEY: &str = "PracticeSessions";

/// Repository for the progress ledger.
pub trait ProgressRepository {
    fn load_progress(&self) -> Result<ProgressLedger>;
    fn save_progress(&self, ledger: &ProgressLedger) -> Result<()>;
}

/// Repository for practice settings.
pub trait SettingsRepository {
    fn load_settings(&self) -> Result<PracticeSettings>;
    fn save_settings(&self, settings: &PracticeSettings) -> Result<()>;
}

/// Repository for finished session history.
pub trait SessionRepository {
    fn load_sessions(&self) -> Result<Vec<SessionRecord>>;
    fn save_sessions(&self, sessions: &[SessionRecord]) -> Result<()>;
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32> {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .map_err(Into::into)
    }

    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn put_value(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    /// Read a blob, falling back to the default when it is absent or malformed.
    fn load_json<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        let Some(raw) = self.get_value(key)? else {
            tracing::debug!(key, "no stored value, using default");
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value is malformed, using default");
                Ok(T::default())
            }
        }
    }

    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.put_value(key, &raw)
    }
}

impl ProgressRepository for SqliteRepository {
    fn load_progress(&self) -> Result<ProgressLedger> {
        self.load_json(PROGRESS_KEY)
    }

    fn save_progress(&self, ledger: &ProgressLedger) -> Result<()> {
        self.save_json(PROGRESS_KEY, ledger)
    }
}

impl SettingsRepository for SqliteRepository {
    fn load_settings(&self) -> Result<PracticeSettings> {
        self.load_json(SETTINGS_KEY)
    }

    fn save_settings(&self, settings: &PracticeSettings) -> Result<()> {
        self.save_json(SETTINGS_KEY, settings)
    }
}

impl SessionRepository for SqliteRepository {
    fn load_sessions(&self) -> Result<Vec<SessionRecord>> {
        self.load_json(SESSIONS_KEY)
    }

    fn save_sessions(&self, sessions: &[SessionRecord]) -> Result<()> {
        self.save_json(SESSIONS_KEY, sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinyin_core::{AnswerOutcome, ChapterId, HskLevel, PracticeMode};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    #[test]
    fn test_fresh_database_returns_defaults() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(repo.schema_version().unwrap(), SCHEMA_VERSION);
        assert_eq!(repo.load_progress().unwrap(), ProgressLedger::default());
        assert_eq!(repo.load_settings().unwrap(), PracticeSettings::default());
        assert!(repo.load_sessions().unwrap().is_empty());
    }

    #[test]
    fn test_progress_round_trip() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let mut ledger = ProgressLedger::new();
        ledger.record_answer("你", AnswerOutcome::Correct);
        ledger.record_answer("好", AnswerOutcome::Partial);
        ledger.update_chapter_progress(ChapterId::new(HskLevel::Hsk1, 1), "你", 2);

        repo.save_progress(&ledger).unwrap();
        assert_eq!(repo.load_progress().unwrap(), ledger);
    }

    #[test]
    fn test_settings_overwrite() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let mut settings = PracticeSettings::default();
        repo.save_settings(&settings).unwrap();

        settings.practice_mode = PracticeMode::Chapter;
        settings.require_tones = false;
        settings.selected_chapters = BTreeSet::from([ChapterId::new(HskLevel::Hsk2, 3)]);
        repo.save_settings(&settings).unwrap();

        assert_eq!(repo.load_settings().unwrap(), settings);
        let raw = repo.get_value(SETTINGS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"hsk2-3\""));
    }

    #[test]
    fn test_malformed_blob_falls_back_to_default() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.put_value(PROGRESS_KEY, "{not json").unwrap();
        assert_eq!(repo.load_progress().unwrap(), ProgressLedger::default());
    }

    #[test]
    fn test_partial_settings_blob_fills_defaults() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.put_value(SETTINGS_KEY, r#"{"practice_mode":"random"}"#)
            .unwrap();
        let settings = repo.load_settings().unwrap();
        assert_eq!(settings.practice_mode, PracticeMode::Random);
        assert!(settings.require_tones);
        assert_eq!(settings.selected_levels, BTreeSet::from([HskLevel::Hsk1]));
    }
}
