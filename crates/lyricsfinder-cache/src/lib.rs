//! SQLite cache of romanized lyrics.
//!
//! A single two-column table maps the query string to the romanized lyric
//! text. Entries never expire; a re-fetch replaces the row for its query.

use lyricsfinder_model::{CacheEntry, FetchError, Query};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const MAX_CONNECTIONS: u32 = 5;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS lyrics (
        query TEXT PRIMARY KEY,
        lyrics_text TEXT NOT NULL
    )
"#;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<CacheError> for FetchError {
    fn from(e: CacheError) -> Self {
        FetchError::Cache(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Handle to the lyrics cache database.
///
/// Cloning is cheap and shares the underlying pool. Each statement checks a
/// connection out of the pool and returns it when the statement finishes,
/// whether it succeeded or not.
#[derive(Debug, Clone)]
pub struct LyricsCache {
    pool: SqlitePool,
}

impl LyricsCache {
    async fn new(options: SqliteConnectOptions, max: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Open (creating if missing) the cache database at `path`.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_millis(1500));
        let cache = Self::new(options, MAX_CONNECTIONS).await?;
        tracing::info!(path = %path.display(), "Opened lyrics cache");
        Ok(cache)
    }

    /// Open a private in-memory cache.
    ///
    /// Limited to one connection that is never recycled: every in-memory
    /// connection sees its own empty database.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(":memory:");
        Self::new(options, 1).await
    }

    /// Look up the cached lyrics for a query.
    pub async fn get(&self, query: &Query) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT lyrics_text FROM lyrics WHERE query = ?")
            .bind(query.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(text,)| text))
    }

    /// Insert or replace the entry for its query.
    pub async fn put(&self, entry: &CacheEntry) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO lyrics (query, lyrics_text) VALUES (?, ?)")
            .bind(entry.query.as_str())
            .bind(&entry.lyrics_text)
            .execute(&self.pool)
            .await?;
        tracing::debug!(query = %entry.query, bytes = entry.lyrics_text.len(), "Stored lyrics");
        Ok(())
    }

    /// Number of cached queries.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lyrics")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
