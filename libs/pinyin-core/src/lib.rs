//! Core of the HSK pinyin practice tool.
//!
//! Provides:
//! - Pinyin normalization and answer classification
//! - The HSK chapter curriculum and vocabulary indexing
//! - The progress ledger with chapter unlocking
//! - Practice queue selection and the practice session state machine
//!
//! The crate is synchronous and does no I/O. Hosts load vocabulary, persist
//! the ledger and forward [`PracticeEvent`]s.

pub mod curriculum;
pub mod error;
pub mod events;
pub mod matching;
pub mod normalize;
pub mod progress;
pub mod queue;
pub mod session;
pub mod types;
pub mod vocabulary;

pub use curriculum::{ChapterInfo, Curriculum};
pub use error::{ChapterIdError, Result, VocabularyError};
pub use events::{EventSink, NullSink, PracticeEvent};
pub use matching::{classify, classify_word, looks_complete, MatchResult};
pub use normalize::{normalize, strip_tones, NormalizedPinyin};
pub use progress::{ChapterProgress, ProgressLedger, ProgressStats, UNLOCK_THRESHOLD};
pub use queue::build_queue;
pub use session::{
    Feedback, PracticeContext, PracticeSession, SessionEnd, SessionRecord, SessionSummary,
};
pub use types::{
    AnswerOutcome, ChapterId, HskLevel, MatchOutcome, PracticeMode, PracticeSettings,
    Pronunciation, VocabularyWord, WordId,
};
pub use vocabulary::{parse_hsk_list, Vocabulary};
