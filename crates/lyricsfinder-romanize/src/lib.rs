//! Japanese script to Latin transliteration for lyric text.
//!
//! Romanization is pluggable through the [`Romanizer`] trait. The default
//! [`KakasiRomanizer`] converts kanji, hiragana and katakana with the
//! `kakasi` dictionary; lines without Japanese script are passed through
//! untouched, so Latin text is returned as-is and the line structure of
//! the input is always preserved.

/// Converts Japanese script in a text block to Latin letters.
///
/// Implementations must keep newlines where they are: the output has the
/// same number of lines as the input, in the same order.
pub trait Romanizer: Send + Sync {
    fn romanize(&self, text: &str) -> String;
}

/// Romanizer backed by the `kakasi` kanji/kana dictionary.
#[derive(Debug, Clone, Copy, Default)]
pub struct KakasiRomanizer;

impl Romanizer for KakasiRomanizer {
    fn romanize(&self, text: &str) -> String {
        let out = map_lines(text, |line| {
            if contains_japanese(line) {
                kakasi::convert(line).romaji
            } else {
                line.to_string()
            }
        });
        tracing::debug!(
            lines = text.split('\n').count(),
            japanese_lines = text.split('\n').filter(|l| contains_japanese(l)).count(),
            "Romanized lyrics"
        );
        out
    }
}

/// Identity romanizer, for deployments or tests that want the original script.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Romanizer for Passthrough {
    fn romanize(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Apply `f` to every line, re-joining with the original `\n` separators.
///
/// `split('\n')` (not `lines()`) keeps a trailing newline and `\r` intact.
fn map_lines(text: &str, f: impl Fn(&str) -> String) -> String {
    text.split('\n').map(f).collect::<Vec<_>>().join("\n")
}

/// Whether the text contains hiragana, katakana or CJK ideographs.
pub fn contains_japanese(text: &str) -> bool {
    text.chars().any(is_japanese_char)
}

fn is_japanese_char(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'   // hiragana
        | '\u{30A0}'..='\u{30FF}' // katakana
        | '\u{31F0}'..='\u{31FF}' // katakana phonetic extensions
        | '\u{FF66}'..='\u{FF9F}' // half-width katakana
        | '\u{3400}'..='\u{4DBF}' // CJK extension A
        | '\u{4E00}'..='\u{9FFF}' // CJK unified ideographs
        | '\u{F900}'..='\u{FAFF}' // CJK compatibility ideographs
        | '\u{3005}'              // 々
    )
}
