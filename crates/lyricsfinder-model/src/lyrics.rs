use serde::{Deserialize, Serialize};

use crate::query::Query;

/// One candidate result returned by the search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Absolute URL of the song page.
    pub url: String,
    /// Provider-relative path of the song page (e.g., "/Kenshi-yonezu-lemon-lyrics").
    #[serde(default)]
    pub path: String,
    /// Displayable title (e.g., "Lemon by Kenshi Yonezu").
    #[serde(default)]
    pub title: String,
}

/// Position of the line classifier relative to the lyric body of a page.
///
/// Transitions are monotonic: `BeforeLyrics -> InLyrics -> AfterLyrics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LyricsState {
    #[default]
    BeforeLyrics,
    InLyrics,
    AfterLyrics,
}

/// What the classifier decided to do with a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDecision {
    /// Genuine lyric content, or a blank separator inside the lyrics.
    Keep,
    /// Blank line outside the lyric body.
    SkipBlank,
    /// Page title header ("Song Lyrics") or a section tag ("[Chorus]").
    SkipHeader,
    /// Contributor credits, release notes, "Read More" and similar.
    SkipMetadata,
    /// Translation language label ("Français", "[Español]", "Deutsch:").
    SkipTranslationLabel,
    /// Content after the end of the lyric body was detected.
    SkipTrailing,
}

impl LineDecision {
    pub fn is_kept(self) -> bool {
        self == LineDecision::Keep
    }
}

/// A raw line tagged with its classification and the state after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    pub text: String,
    pub decision: LineDecision,
    pub state: LyricsState,
}

/// Cleaned lyric text: kept lines joined by newlines, outer whitespace trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LyricBlock(String);

impl LyricBlock {
    /// Join kept lines into a block, trimming the outer boundary.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let joined = lines
            .iter()
            .map(|l| l.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        Self(joined.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// A persisted (query, romanized lyrics) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub query: Query,
    pub lyrics_text: String,
}

/// Successful result of a lyrics request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsOutcome {
    /// Served from the cache without any outbound call.
    Cached(String),
    /// Fetched from the provider, cleaned, romanized and stored.
    Fetched { lyrics: String, hit: SearchHit },
    /// The provider returned zero hits.
    NoResults,
}

impl LyricsOutcome {
    /// Lyric text to hand back to the caller (empty for `NoResults`).
    pub fn lyrics(&self) -> &str {
        match self {
            LyricsOutcome::Cached(text) => text,
            LyricsOutcome::Fetched { lyrics, .. } => lyrics,
            LyricsOutcome::NoResults => "",
        }
    }

    pub fn into_lyrics(self) -> String {
        match self {
            LyricsOutcome::Cached(text) => text,
            LyricsOutcome::Fetched { lyrics, .. } => lyrics,
            LyricsOutcome::NoResults => String::new(),
        }
    }
}
