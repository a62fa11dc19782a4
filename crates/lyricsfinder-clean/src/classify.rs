// Line classification for scraped lyric pages.
//
// A page interleaves the real lyrics with a title header, section tags,
// contributor credits and a trailing block of translation-language links.
// The classifier is a three-state machine (before / in / after lyrics):
// the first kept line enters the lyrics, and the first metadata or
// language label seen inside the lyrics ends them. Everything after that
// boundary is dropped.

use lyricsfinder_model::{LineDecision, LyricsState};

use crate::patterns::ClassifierPatterns;

/// Maximum token count for a line to be taken as a "Song Title Lyrics" header.
const HEADER_MAX_TOKENS: usize = 6;

/// Maximum token count for a line containing a metadata phrase to be skipped.
const METADATA_MAX_TOKENS: usize = 3;

/// Classify one line given the current state.
///
/// Rules are evaluated in order, first match wins:
/// 1. blank line: kept as a separator inside the lyrics, skipped elsewhere
/// 2. `... Lyrics` title header (before the lyrics only)
/// 3. `[Section]` / `{Section}` tag
/// 4. metadata phrase (ends the lyrics if inside them)
/// 5. translation language label (ends the lyrics if inside them)
/// 6. anything else: lyric content, unless the lyrics already ended
pub fn classify(
    line: &str,
    state: LyricsState,
    patterns: &ClassifierPatterns,
) -> (LineDecision, LyricsState) {
    let line = line.trim();

    if line.is_empty() {
        return if state == LyricsState::InLyrics {
            (LineDecision::Keep, state)
        } else {
            (LineDecision::SkipBlank, state)
        };
    }

    let tokens = line.split_whitespace().count();

    if state == LyricsState::BeforeLyrics && is_title_header(line, tokens) {
        return (LineDecision::SkipHeader, state);
    }

    if is_section_tag(line) {
        return (LineDecision::SkipHeader, state);
    }

    if is_metadata(line, tokens, &patterns.metadata) {
        return (LineDecision::SkipMetadata, end_of_lyrics(state));
    }

    if is_language_label(line, &patterns.languages) {
        return (LineDecision::SkipTranslationLabel, end_of_lyrics(state));
    }

    match state {
        LyricsState::AfterLyrics => (LineDecision::SkipTrailing, state),
        _ => (LineDecision::Keep, LyricsState::InLyrics),
    }
}

/// Boilerplate found inside the lyrics marks their end.
fn end_of_lyrics(state: LyricsState) -> LyricsState {
    match state {
        LyricsState::InLyrics => LyricsState::AfterLyrics,
        other => other,
    }
}

/// "Song Title Lyrics" style page header.
fn is_title_header(line: &str, tokens: usize) -> bool {
    tokens <= HEADER_MAX_TOKENS
        && line
            .split_whitespace()
            .last()
            .is_some_and(|last| last.to_lowercase() == "lyrics")
}

/// Section markers like "[Chorus]", "[Verse 1: Ado]" or "{Intro}".
fn is_section_tag(line: &str) -> bool {
    (line.starts_with('[') && line.contains(']')) || (line.starts_with('{') && line[1..].contains('}'))
}

fn is_metadata(line: &str, tokens: usize, metadata: &[String]) -> bool {
    metadata
        .iter()
        .filter(|p| !p.is_empty())
        .any(|p| line.contains(p.as_str()) && (tokens <= METADATA_MAX_TOKENS || line == p))
}

/// Whether the line is, or contains as a standalone token, a language label.
///
/// Each label also matches with a trailing colon or wrapped in brackets or
/// parentheses ("Français:", "[Español]", "(Deutsch)").
fn is_language_label(line: &str, languages: &[String]) -> bool {
    let padded = format!(" {line} ");
    languages
        .iter()
        .filter(|l| !l.is_empty())
        .flat_map(|l| label_forms(l))
        .any(|form| line == form || padded.contains(&format!(" {form} ")))
}

fn label_forms(label: &str) -> [String; 4] {
    [
        label.to_string(),
        format!("{label}:"),
        format!("[{label}]"),
        format!("({label})"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(line: &str, state: LyricsState) -> (LineDecision, LyricsState) {
        classify(line, state, &ClassifierPatterns::default())
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(
            run("", LyricsState::InLyrics),
            (LineDecision::Keep, LyricsState::InLyrics)
        );
        assert_eq!(
            run("   ", LyricsState::BeforeLyrics),
            (LineDecision::SkipBlank, LyricsState::BeforeLyrics)
        );
        assert_eq!(
            run("", LyricsState::AfterLyrics),
            (LineDecision::SkipBlank, LyricsState::AfterLyrics)
        );
    }

    #[test]
    fn test_title_header_only_before_lyrics() {
        assert_eq!(
            run("Lemon Lyrics", LyricsState::BeforeLyrics),
            (LineDecision::SkipHeader, LyricsState::BeforeLyrics)
        );
        assert_eq!(
            run("Kenshi Yonezu - Lemon (Japanese) LYRICS", LyricsState::BeforeLyrics).0,
            LineDecision::SkipHeader
        );
        // Too long to be a header.
        assert_eq!(
            run("one two three four five six seven lyrics", LyricsState::BeforeLyrics).0,
            LineDecision::Keep
        );
        // Inside the lyrics, a line ending in "lyrics" is content.
        assert_eq!(
            run("I forgot the lyrics", LyricsState::InLyrics),
            (LineDecision::Keep, LyricsState::InLyrics)
        );
    }

    #[test]
    fn test_title_header_needs_lyrics_word() {
        assert_eq!(
            run("Bloodlyrics", LyricsState::BeforeLyrics),
            (LineDecision::Keep, LyricsState::InLyrics)
        );
        assert_eq!(
            run("Lemon (Lyrics)", LyricsState::BeforeLyrics).0,
            LineDecision::Keep
        );
        assert_eq!(
            run("  Idol   lyrics  ", LyricsState::BeforeLyrics).0,
            LineDecision::SkipHeader
        );
    }

    #[test]
    fn test_section_tags() {
        for line in ["[Chorus]", "[Verse 1: Ado]", "{Intro}", "[Pre-Chorus] (x2)"] {
            assert_eq!(
                run(line, LyricsState::InLyrics),
                (LineDecision::SkipHeader, LyricsState::InLyrics),
                "{line}"
            );
        }
        assert_eq!(run("[unterminated", LyricsState::InLyrics).0, LineDecision::Keep);
        assert_eq!(run("{", LyricsState::InLyrics).0, LineDecision::Keep);
    }

    #[test]
    fn test_metadata_short_lines() {
        assert_eq!(
            run("23 Contributors", LyricsState::BeforeLyrics),
            (LineDecision::SkipMetadata, LyricsState::BeforeLyrics)
        );
        assert_eq!(
            run("Translations", LyricsState::InLyrics),
            (LineDecision::SkipMetadata, LyricsState::AfterLyrics)
        );
        assert_eq!(
            run("Read More", LyricsState::AfterLyrics),
            (LineDecision::SkipMetadata, LyricsState::AfterLyrics)
        );
    }

    #[test]
    fn test_metadata_long_line_needs_exact_match() {
        // Long line that merely mentions a pattern stays lyric content.
        assert_eq!(
            run("this song was released on the radio today", LyricsState::InLyrics),
            (LineDecision::Keep, LyricsState::InLyrics)
        );
        // Exact match of a multi-word pattern, regardless of length.
        assert_eq!(
            run("You might also like", LyricsState::InLyrics),
            (LineDecision::SkipMetadata, LyricsState::AfterLyrics)
        );
    }

    #[test]
    fn test_language_labels() {
        for line in ["Français", "Deutsch:", "(Italiano)", "Bahasa Indonesia", "日本語"] {
            assert_eq!(
                run(line, LyricsState::InLyrics),
                (LineDecision::SkipTranslationLabel, LyricsState::AfterLyrics),
                "{line}"
            );
        }
        // Bracketed labels are caught by the section-tag rule first.
        assert_eq!(run("[Español]", LyricsState::InLyrics).0, LineDecision::SkipHeader);
        // Standalone token inside a longer line.
        assert_eq!(
            run("Lemon English Translation", LyricsState::BeforeLyrics),
            (LineDecision::SkipTranslationLabel, LyricsState::BeforeLyrics)
        );
        // Substring of a word is not a token.
        assert_eq!(run("Englishman in New York", LyricsState::InLyrics).0, LineDecision::Keep);
    }

    #[test]
    fn test_content_and_trailing() {
        assert_eq!(
            run("夢ならばどれほどよかったでしょう", LyricsState::BeforeLyrics),
            (LineDecision::Keep, LyricsState::InLyrics)
        );
        assert_eq!(
            run("Bonjour", LyricsState::AfterLyrics),
            (LineDecision::SkipTrailing, LyricsState::AfterLyrics)
        );
    }

    #[test]
    fn test_custom_patterns() {
        let patterns = ClassifierPatterns {
            metadata: vec!["Produced by".into()],
            languages: vec!["Esperanto".into()],
        };
        assert_eq!(
            classify("Produced by Someone", LyricsState::InLyrics, &patterns),
            (LineDecision::SkipMetadata, LyricsState::AfterLyrics)
        );
        assert_eq!(
            classify("Esperanto:", LyricsState::BeforeLyrics, &patterns).0,
            LineDecision::SkipTranslationLabel
        );
        // Default lists are not consulted.
        assert_eq!(
            classify("Français", LyricsState::InLyrics, &patterns).0,
            LineDecision::Keep
        );
    }
}
