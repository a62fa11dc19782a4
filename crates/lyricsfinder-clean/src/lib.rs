use lyricsfinder_model::{ClassifiedLine, LyricBlock, LyricsState};

pub mod classify;
pub mod normalize;
pub mod patterns;

pub use classify::classify;
pub use patterns::ClassifierPatterns;

/// Run the classifier over lines in page order, carrying state forward.
///
/// Each line is NFC-normalized and trimmed before classification; the
/// returned trace holds the normalized text.
pub fn classify_lines<S: AsRef<str>>(
    lines: &[S],
    patterns: &ClassifierPatterns,
) -> Vec<ClassifiedLine> {
    let mut state = LyricsState::BeforeLyrics;

    lines
        .iter()
        .map(|raw| {
            let text = normalize::normalize_line(raw.as_ref());
            let (decision, next) = classify::classify(&text, state, patterns);
            state = next;
            ClassifiedLine {
                text,
                decision,
                state,
            }
        })
        .collect()
}

/// Clean scraped lines into a lyric block.
///
/// Keeps only lines the classifier accepts, collapses runs of blank
/// separators, joins with newlines and trims the result. An empty block
/// means nothing on the page looked like lyrics.
pub fn clean<S: AsRef<str>>(lines: &[S], patterns: &ClassifierPatterns) -> LyricBlock {
    let classified = classify_lines(lines, patterns);

    for line in &classified {
        tracing::trace!(decision = ?line.decision, state = ?line.state, text = %line.text, "Classified line");
    }

    let kept: Vec<String> = classified
        .into_iter()
        .filter(|l| l.decision.is_kept())
        .map(|l| l.text)
        .collect();
    let kept = normalize::collapse_blank_lines(kept);

    let block = LyricBlock::from_lines(&kept);
    tracing::debug!(
        input = lines.len(),
        kept = block.as_str().lines().count(),
        "Cleaned lyric lines"
    );
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyricsfinder_model::LineDecision;

    #[test]
    fn test_clean_drops_header_tags_and_trailing_translations() {
        let lines = [
            "X Lyrics",
            "[Verse]",
            "Real line one",
            "",
            "Real line two",
            "1 Contributor",
            "Translations",
            "Deutsch",
        ];

        let classified = classify_lines(&lines, &ClassifierPatterns::default());
        let kept: Vec<&str> = classified
            .iter()
            .filter(|l| l.decision.is_kept())
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(kept, vec!["Real line one", "", "Real line two"]);

        let block = clean(&lines, &ClassifierPatterns::default());
        assert_eq!(block.as_str(), "Real line one\n\nReal line two");
    }

    #[test]
    fn test_classification_trace() {
        let lines = ["Lemon Lyrics", "[Chorus]", "Hello world", "", "Thanks", "Translations", "Bonjour"];
        let classified = classify_lines(&lines, &ClassifierPatterns::default());

        let decisions: Vec<LineDecision> = classified.iter().map(|l| l.decision).collect();
        assert_eq!(
            decisions,
            vec![
                LineDecision::SkipHeader,
                LineDecision::SkipHeader,
                LineDecision::Keep,
                LineDecision::Keep,
                LineDecision::Keep,
                LineDecision::SkipMetadata,
                LineDecision::SkipTrailing,
            ]
        );
        assert_eq!(classified[1].state, LyricsState::BeforeLyrics);
        assert_eq!(classified[2].state, LyricsState::InLyrics);
        assert_eq!(classified[5].state, LyricsState::AfterLyrics);
        assert_eq!(classified[6].state, LyricsState::AfterLyrics);
    }

    #[test]
    fn test_leading_metadata_does_not_end_lyrics() {
        // Genius page header before the lyric body.
        let lines = [
            "23 Contributors",
            "Translations",
            "English",
            "Romanization",
            "Lemon Lyrics",
            "",
            "[Verse 1]",
            "夢ならばどれほどよかったでしょう",
            "未だにあなたのことを夢にみる",
            "",
            "",
            "[Chorus]",
            "今でもあなたはわたしの光",
        ];

        let block = clean(&lines, &ClassifierPatterns::default());
        assert_eq!(
            block.as_str(),
            "夢ならばどれほどよかったでしょう\n未だにあなたのことを夢にみる\n\n今でもあなたはわたしの光"
        );
    }

    #[test]
    fn test_clean_empty_when_nothing_kept() {
        let lines = ["Lemon Lyrics", "[Instrumental]", "", "5 Contributors"];
        assert!(clean(&lines, &ClassifierPatterns::default()).is_empty());
    }

    #[test]
    fn test_trailing_blank_separators_trimmed() {
        let lines = ["  first line  ", "", "second line", "", "", "Read More"];
        let block = clean(&lines, &ClassifierPatterns::default());
        assert_eq!(block.as_str(), "first line\n\nsecond line");
    }
}
