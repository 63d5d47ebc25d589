//! Loading HSK word lists from disk.

use pinyin_core::{parse_hsk_list, Curriculum, HskLevel, Vocabulary};
use std::fs;
use std::path::Path;

/// Read `{level}.min.json` for every HSK level in `dir`.
///
/// Missing or malformed files are logged and skipped, so a partial
/// directory still yields a usable vocabulary.
pub fn load_vocabulary_dir(dir: &Path, curriculum: &Curriculum) -> Vocabulary {
    let mut words = Vec::new();
    for level in HskLevel::ALL {
        let path = dir.join(format!("{}.min.json", level.number()));
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping vocabulary file");
                continue;
            }
        };
        match parse_hsk_list(level, &content) {
            Ok(parsed) => {
                tracing::debug!(level = level.number(), count = parsed.len(), "loaded vocabulary");
                words.extend(parsed);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping vocabulary file")
            }
        }
    }

    let vocabulary = Vocabulary::new(words, curriculum);
    tracing::info!(words = vocabulary.len(), dir = %dir.display(), "vocabulary ready");
    vocabulary
}
