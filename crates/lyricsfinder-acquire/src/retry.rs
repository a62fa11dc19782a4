// Retry with exponential backoff for rate-limited provider searches.
//
// Only `ProviderError::RateLimited` is retried. Every other failure is
// returned on the first attempt.

use std::time::Duration;

use lyricsfinder_model::SearchHit;

use crate::provider::{LyricsProvider, ProviderError};

/// Attempt cap and backoff base for provider searches.
///
/// The delay before retry `n` (0-based) is `base_delay * 2^n`, so the
/// defaults wait 1s, 2s, then 4s across four attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay applied after the `retry`-th rate-limited attempt (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(retry))
    }

    /// Every delay the policy can apply, in order.
    pub fn schedule(&self) -> Vec<Duration> {
        (0..self.max_attempts.saturating_sub(1))
            .map(|n| self.delay_for(n))
            .collect()
    }
}

/// Hits from a successful search plus how much retrying it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchAttempts {
    pub hits: Vec<SearchHit>,
    pub attempts: u32,
    pub backoff: Duration,
}

/// Run `provider.search`, backing off and retrying while rate limited.
///
/// Returns [`ProviderError::RateLimitExhausted`] when the attempt cap is
/// reached while still rate limited.
pub async fn search_with_retry<P>(
    provider: &P,
    query: &str,
    policy: &RetryPolicy,
) -> Result<SearchAttempts, ProviderError>
where
    P: LyricsProvider + ?Sized,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = Duration::ZERO;
    let mut attempt = 0;

    loop {
        attempt += 1;
        match provider.search(query).await {
            Ok(hits) => {
                return Ok(SearchAttempts {
                    hits,
                    attempts: attempt,
                    backoff,
                });
            }
            Err(ProviderError::RateLimited) if attempt < max_attempts => {
                let delay = policy.delay_for(attempt - 1);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Search rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
                backoff += delay;
            }
            Err(ProviderError::RateLimited) => {
                tracing::error!(attempts = attempt, "Search still rate limited, giving up");
                return Err(ProviderError::RateLimitExhausted { attempts: attempt });
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct ScriptedSearch {
        responses: Mutex<VecDeque<Result<Vec<SearchHit>, ProviderError>>>,
        calls: AtomicU32,
    }

    impl ScriptedSearch {
        fn new(responses: Vec<Result<Vec<SearchHit>, ProviderError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl LyricsProvider for ScriptedSearch {
        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(Vec::new()))
        }

        async fn fetch_page(&self, url: &str) -> Result<String, ProviderError> {
            panic!("unexpected page fetch: {url}");
        }
    }

    fn hit() -> SearchHit {
        SearchHit {
            url: "https://genius.com/Kenshi-yonezu-lemon-lyrics".into(),
            path: "/Kenshi-yonezu-lemon-lyrics".into(),
            title: "Lemon by Kenshi Yonezu".into(),
        }
    }

    #[test]
    fn test_default_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.schedule(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_fourth_attempt() {
        let provider = ScriptedSearch::new(vec![
            Err(ProviderError::RateLimited),
            Err(ProviderError::RateLimited),
            Err(ProviderError::RateLimited),
            Ok(vec![hit()]),
        ]);
        let policy = RetryPolicy::default();
        let start = tokio::time::Instant::now();

        let result = search_with_retry(&provider, "lemon", &policy).await.unwrap();

        let expected: Duration = policy.schedule().iter().sum();
        assert_eq!(expected, Duration::from_secs(7));
        assert_eq!(result.backoff, expected);
        assert_eq!(result.attempts, 4);
        assert_eq!(result.hits, vec![hit()]);
        assert!(start.elapsed() >= expected);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_after_cap() {
        let provider = ScriptedSearch::new(vec![
            Err(ProviderError::RateLimited),
            Err(ProviderError::RateLimited),
            Err(ProviderError::RateLimited),
            Err(ProviderError::RateLimited),
            Ok(vec![hit()]),
        ]);

        let err = search_with_retry(&provider, "lemon", &RetryPolicy::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::RateLimitExhausted { attempts: 4 }));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_not_retried() {
        let provider = ScriptedSearch::new(vec![
            Err(ProviderError::Status {
                status: 500,
                url: "https://api.genius.com/search".into(),
            }),
            Ok(vec![hit()]),
        ]);
        let start = tokio::time::Instant::now();

        let err = search_with_retry(&provider, "lemon", &RetryPolicy::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Status { status: 500, .. }));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_empty_hits_is_success() {
        let provider = ScriptedSearch::new(vec![Ok(Vec::new())]);
        let result = search_with_retry(&provider, "nothing", &RetryPolicy::default())
            .await
            .unwrap();
        assert!(result.hits.is_empty());
        assert_eq!(result.attempts, 1);
        assert_eq!(result.backoff, Duration::ZERO);
    }
}
