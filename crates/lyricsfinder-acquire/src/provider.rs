use async_trait::async_trait;
use lyricsfinder_model::{FetchError, SearchHit};
use thiserror::Error;

/// Errors from the search provider or the lyric page host.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("rate limited (HTTP 429)")]
    RateLimited,

    #[error("still rate limited after {attempts} attempts")]
    RateLimitExhausted { attempts: u32 },

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout(e.to_string())
        } else if e.is_decode() {
            ProviderError::Decode(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

impl From<ProviderError> for FetchError {
    fn from(e: ProviderError) -> Self {
        FetchError::UpstreamRequestFailed(e.to_string())
    }
}

/// A source of song search results and lyric pages.
///
/// The production implementation is [`crate::GeniusClient`]; tests substitute
/// scripted providers to exercise the pipeline without network access.
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Search for songs matching `query`, in provider ranking order.
    ///
    /// A rate-limit response must be reported as [`ProviderError::RateLimited`]
    /// so callers can apply their retry policy.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError>;

    /// Fetch the HTML of a song page.
    async fn fetch_page(&self, url: &str) -> Result<String, ProviderError>;
}
