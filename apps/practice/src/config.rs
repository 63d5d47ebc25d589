//! Runtime configuration from the environment.

use std::path::PathBuf;
use std::time::Duration;

const APP_DIR: &str = "pinyin-practice";
const DEFAULT_AUTO_CHECK_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub vocabulary_dir: PathBuf,
    /// Delay before a complete-looking answer is checked automatically.
    pub auto_check_delay: Duration,
    pub log_filter: String,
}

impl AppConfig {
    /// Read configuration after loading any `.env` file.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("PINYIN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let vocabulary_dir = lookup("PINYIN_VOCAB_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("vocabulary"));

        let auto_check_ms = match lookup("PINYIN_AUTO_CHECK_MS") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid PINYIN_AUTO_CHECK_MS, using default");
                DEFAULT_AUTO_CHECK_MS
            }),
            None => DEFAULT_AUTO_CHECK_MS,
        };

        Self {
            data_dir,
            vocabulary_dir,
            auto_check_delay: Duration::from_millis(auto_check_ms),
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| "info".into()),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("progress.db")
    }
}

fn default_data_dir() -> PathBuf {
    // Use app data directory for production, fallback to current dir
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.auto_check_delay, Duration::from_millis(500));
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.vocabulary_dir, config.data_dir.join("vocabulary"));
        assert!(config.db_path().ends_with("progress.db"));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PINYIN_DATA_DIR", "/tmp/pp"),
            ("PINYIN_VOCAB_DIR", "/srv/hsk"),
            ("PINYIN_AUTO_CHECK_MS", "250"),
            ("RUST_LOG", "debug"),
        ]);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/pp/progress.db"));
        assert_eq!(config.vocabulary_dir, PathBuf::from("/srv/hsk"));
        assert_eq!(config.auto_check_delay, Duration::from_millis(250));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_invalid_delay_uses_default() {
        let config = config(&[("PINYIN_AUTO_CHECK_MS", "soon")]);
        assert_eq!(config.auto_check_delay, Duration::from_millis(500));
    }
}
