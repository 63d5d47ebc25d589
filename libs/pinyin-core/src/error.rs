//! Error types for pinyin-core.

use thiserror::Error;

/// Result type alias using VocabularyError.
pub type Result<T> = std::result::Result<T, VocabularyError>;

/// Errors that can occur while reading a vocabulary list.
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("invalid vocabulary json for HSK {level}: {source}")]
    Json {
        level: u8,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors produced when parsing a chapter id string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChapterIdError {
    #[error("malformed chapter id: {0:?}")]
    Malformed(String),

    #[error("unknown HSK level in chapter id: {0:?}")]
    UnknownLevel(String),

    #[error("chapter number must be at least 1: {0:?}")]
    ZeroChapter(String),
}
