//! Test fixtures: a small HSK 1 word list.

use pinyin_core::{parse_hsk_list, Curriculum, HskLevel, Vocabulary};

/// Four HSK 1 words, most frequent first. Each lands in its own chapter
/// (hsk1-1, hsk1-4, hsk1-8, hsk1-11).
pub const HSK1_JSON: &str = r#"[
    {"s":"你","q":1,"f":[{"t":"你","i":{"y":"nǐ","n":"ni3"},"m":["you"]}]},
    {"s":"好","q":2,"f":[{"t":"好","i":{"y":"hǎo","n":"hao3"},"m":["good"]}]},
    {"s":"谢谢","q":3,"f":[{"t":"謝謝","i":{"y":"xièxie","n":"xie4 xie5"},"m":["thanks"]}]},
    {"s":"还","q":4,"f":[
        {"t":"還","i":{"y":"hái","n":"hai2"},"m":["still"]},
        {"t":"還","i":{"y":"huán","n":"huan2"},"m":["to return"]}
    ]}
]"#;

pub fn vocabulary(curriculum: &Curriculum) -> Vocabulary {
    let words = parse_hsk_list(HskLevel::Hsk1, HSK1_JSON).expect("fixture parses");
    Vocabulary::new(words, curriculum)
}

/// A tone-exact answer for a fixture word.
pub fn answer(word_id: &str) -> &'static str {
    match word_id {
        "你" => "ni3",
        "好" => "hao3",
        "谢谢" => "xie4 xie5",
        "还" => "huan2",
        other => panic!("no fixture answer for {other}"),
    }
}

/// Right syllables, wrong tones.
pub fn wrong_tone(word_id: &str) -> &'static str {
    match word_id {
        "你" => "ni2",
        "好" => "hao1",
        "谢谢" => "xie1 xie5",
        "还" => "hai4",
        other => panic!("no fixture answer for {other}"),
    }
}
