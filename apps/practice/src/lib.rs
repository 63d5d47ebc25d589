//! Host for the pinyin practice core: configuration, logging, SQLite
//! persistence and the command surface a UI calls into.

pub mod commands;
pub mod config;
pub mod db;
pub mod debounce;
pub mod state;
pub mod vocabulary;

use anyhow::Context;
use config::AppConfig;
use db::SqliteRepository;
use pinyin_core::Curriculum;
use state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
pub fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Open the database, load vocabulary and build the application state.
pub fn bootstrap(config: &AppConfig) -> anyhow::Result<AppState> {
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("failed to create {}", config.data_dir.display()))?;

    let db_path = config.db_path();
    tracing::info!(path = %db_path.display(), "Opening database...");
    let repository = SqliteRepository::open(&db_path).context("failed to open database")?;

    let curriculum = Curriculum::hsk();
    let vocabulary = vocabulary::load_vocabulary_dir(&config.vocabulary_dir, &curriculum);
    if vocabulary.is_empty() {
        tracing::warn!(dir = %config.vocabulary_dir.display(), "no vocabulary found");
    }

    Ok(AppState::new(
        repository,
        vocabulary,
        curriculum,
        config.auto_check_delay,
    ))
}
