// Boilerplate pattern lists used by the line classifier.
//
// Both lists can be replaced from a JSON file so new page furniture or
// translation languages can be handled without touching classifier logic.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Substrings marking credits, release notes and page chrome.
pub const DEFAULT_METADATA: &[&str] = &[
    "Contributor",
    "cover of a",
    "released on the",
    "compilation",
    "Read More",
    "View More",
    "Translations",
    "Embed",
    "You might also like",
];

/// Translation language labels as they appear in the translations menu.
pub const DEFAULT_LANGUAGES: &[&str] = &[
    "English",
    "Español",
    "Français",
    "Deutsch",
    "Italiano",
    "Português",
    "Nederlands",
    "Polski",
    "Svenska",
    "Türkçe",
    "Русский",
    "Українська",
    "Română",
    "Magyar",
    "Čeština",
    "Ελληνικά",
    "العربية",
    "فارسی",
    "עברית",
    "हिन्दी",
    "ไทย",
    "Tiếng Việt",
    "Bahasa Indonesia",
    "Tagalog",
    "한국어",
    "中文",
    "简体中文",
    "繁體中文",
    "日本語",
    "Romanization",
];

/// Pattern sets consulted by [`crate::classify::classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierPatterns {
    /// Metadata substrings (rule: contained AND short line, or exact match).
    #[serde(default)]
    pub metadata: Vec<String>,
    /// Language names/codes, matched exactly or as standalone tokens.
    #[serde(default)]
    pub languages: Vec<String>,
}

impl Default for ClassifierPatterns {
    fn default() -> Self {
        Self {
            metadata: DEFAULT_METADATA.iter().map(|s| s.to_string()).collect(),
            languages: DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ClassifierPatterns {
    /// Load patterns from a JSON file.
    ///
    /// A list omitted from the file falls back to the built-in defaults, so a
    /// file containing only `{"languages": [...]}` keeps the metadata list.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read pattern file {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Failed to parse pattern file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let mut patterns: ClassifierPatterns = serde_json::from_str(text)?;
        let defaults = ClassifierPatterns::default();
        if patterns.metadata.is_empty() {
            patterns.metadata = defaults.metadata;
        }
        if patterns.languages.is_empty() {
            patterns.languages = defaults.languages;
        }
        tracing::debug!(
            metadata = patterns.metadata.len(),
            languages = patterns.languages.len(),
            "Loaded classifier patterns"
        );
        Ok(patterns)
    }
}
