// Cache-backed lyrics fetch pipeline.
//
// received -> cache check -> (hit: respond)
//   | (miss: search with retry -> (no hits: respond empty)
//       | (hit: fetch page -> extract -> clean -> (empty: fail)
//           | (non-empty: romanize -> store -> respond)))

use std::sync::Arc;

use lyricsfinder_acquire::{
    extract_lyric_lines, search_with_retry, ContainerSelectors, LyricsProvider, RetryPolicy,
};
use lyricsfinder_cache::LyricsCache;
use lyricsfinder_clean::ClassifierPatterns;
use lyricsfinder_model::{CacheEntry, FetchError, LyricsOutcome, Query};
use lyricsfinder_romanize::Romanizer;

/// Everything the pipeline needs besides the cache.
pub struct PipelineConfig {
    pub retry: RetryPolicy,
    pub selectors: ContainerSelectors,
    pub patterns: ClassifierPatterns,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            selectors: ContainerSelectors::genius(),
            patterns: ClassifierPatterns::default(),
        }
    }
}

/// The lyrics fetch orchestrator.
///
/// `provider` is `None` when no API credential is configured; cache hits are
/// still served, and any miss fails with [`FetchError::MissingCredential`].
pub struct Pipeline {
    provider: Option<Arc<dyn LyricsProvider>>,
    romanizer: Arc<dyn Romanizer>,
    cache: LyricsCache,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        provider: Option<Arc<dyn LyricsProvider>>,
        romanizer: Arc<dyn Romanizer>,
        cache: LyricsCache,
        config: PipelineConfig,
    ) -> Self {
        Self {
            provider,
            romanizer,
            cache,
            config,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn cache(&self) -> &LyricsCache {
        &self.cache
    }

    /// Fetch romanized lyrics for a raw query string.
    pub async fn fetch(&self, raw_query: &str) -> Result<LyricsOutcome, FetchError> {
        let query = Query::parse(raw_query)?;

        if let Some(lyrics) = self.cache.get(&query).await? {
            tracing::info!(query = %query, "Cache hit");
            return Ok(LyricsOutcome::Cached(lyrics));
        }

        tracing::info!(query = %query, "Cache miss, fetching from provider");
        let provider = self.provider.as_deref().ok_or(FetchError::MissingCredential)?;

        let search = search_with_retry(provider, query.as_str(), &self.config.retry).await?;
        let Some(hit) = search.hits.into_iter().next() else {
            tracing::info!(query = %query, attempts = search.attempts, "No search results");
            return Ok(LyricsOutcome::NoResults);
        };
        tracing::info!(
            query = %query,
            title = %hit.title,
            url = %hit.url,
            attempts = search.attempts,
            backoff_ms = search.backoff.as_millis() as u64,
            "Using first search hit"
        );

        let html = provider.fetch_page(&hit.url).await?;

        let lines = extract_lyric_lines(&html, &self.config.selectors).ok_or_else(|| {
            FetchError::ExtractionFailed(format!("no lyric container found at {}", hit.url))
        })?;

        let block = lyricsfinder_clean::clean(&lines, &self.config.patterns);
        if block.is_empty() {
            return Err(FetchError::ExtractionFailed(format!(
                "no lyric lines left after cleaning {}",
                hit.url
            )));
        }

        let lyrics = self.romanizer.romanize(block.as_str());

        self.cache
            .put(&CacheEntry {
                query: query.clone(),
                lyrics_text: lyrics.clone(),
            })
            .await?;
        tracing::info!(query = %query, lines = lyrics.lines().count(), "Cached lyrics");

        Ok(LyricsOutcome::Fetched { lyrics, hit })
    }
}
