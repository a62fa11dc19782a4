use thiserror::Error;

/// Failures surfaced by the lyrics fetch pipeline.
///
/// "No results" is deliberately absent: an empty search is a successful
/// outcome (see [`crate::LyricsOutcome::NoResults`]).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no query provided")]
    MissingQuery,

    #[error("search provider credential is not configured (set GENIUS_API_KEY)")]
    MissingCredential,

    #[error("upstream request failed: {0}")]
    UpstreamRequestFailed(String),

    #[error("could not extract lyrics: {0}")]
    ExtractionFailed(String),

    #[error("lyrics cache error: {0}")]
    Cache(String),
}

impl FetchError {
    /// Short machine-readable kind, used in logs and API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::MissingQuery => "missing_query",
            FetchError::MissingCredential => "missing_credential",
            FetchError::UpstreamRequestFailed(_) => "upstream_request_failed",
            FetchError::ExtractionFailed(_) => "extraction_failed",
            FetchError::Cache(_) => "cache",
        }
    }
}
