use std::time::Duration;

use async_trait::async_trait;
use lyricsfinder_model::SearchHit;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::provider::{LyricsProvider, ProviderError};

pub const GENIUS_API_URL: &str = "https://api.genius.com";

/// Default timeout for every outbound request (search and page fetch).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

// Genius serves a reduced page to unknown agents, so look like a browser.
const PAGE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Client for the Genius search API and genius.com song pages.
#[derive(Debug, Clone)]
pub struct GeniusClient {
    http: reqwest::Client,
    token: String,
    api_url: String,
}

impl GeniusClient {
    /// Build a client authenticated with a Genius API access token.
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent(PAGE_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            token: token.into(),
            api_url: GENIUS_API_URL.to_string(),
        })
    }

    /// Point the client at a different API base URL (no trailing slash).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl LyricsProvider for GeniusClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError> {
        let url = format!("{}/search", self.api_url);
        tracing::debug!(url = %url, query = %query, "Searching Genius");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("q", query)])
            .send()
            .await?;

        check_status(response.status(), &url)?;

        let body = response.text().await?;
        let hits = parse_search_response(&body)?;
        tracing::debug!(hits = hits.len(), "Genius search returned");
        Ok(hits)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ProviderError> {
        tracing::debug!(url = %url, "Fetching lyric page");

        let response = self.http.get(url).send().await?;
        check_status(response.status(), url)?;

        let html = response.text().await?;
        tracing::debug!(bytes = html.len(), "Received HTML");
        Ok(html)
    }
}

/// Map an HTTP status to a provider error, singling out rate limiting.
fn check_status(status: StatusCode, url: &str) -> Result<(), ProviderError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }
    if !status.is_success() {
        return Err(ProviderError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    response: Option<SearchBody>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    result: RawSong,
}

#[derive(Debug, Deserialize)]
struct RawSong {
    url: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    full_title: String,
}

/// Decode a Genius `/search` body into hits, preserving provider order.
///
/// A body without a `response` object is treated as zero hits.
fn parse_search_response(body: &str) -> Result<Vec<SearchHit>, ProviderError> {
    let envelope: SearchEnvelope =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    let hits = envelope
        .response
        .map(|r| r.hits)
        .unwrap_or_default()
        .into_iter()
        .map(|h| SearchHit {
            url: h.result.url,
            path: h.result.path,
            title: h.result.full_title,
        })
        .collect();

    Ok(hits)
}
