pub mod extract;
pub mod genius;
pub mod provider;
pub mod retry;

pub use extract::{extract_lyric_lines, ContainerSelectors};
pub use genius::GeniusClient;
pub use provider::{LyricsProvider, ProviderError};
pub use retry::{search_with_retry, RetryPolicy, SearchAttempts};
