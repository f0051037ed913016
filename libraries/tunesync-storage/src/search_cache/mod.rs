//! Search result cache
//!
//! Maps a raw (non-canonicalized) query string to the last catalog search
//! result written for it. Each query owns exactly one row: writing an
//! existing query replaces its result and timestamp.
//!
//! A missing query is reported as [`StorageError::NotFound`], never as an
//! empty result, so callers can tell "never searched" from "searched and
//! found nothing".
//!
//! The cache does no locking of its own. Concurrent writers to the same
//! query must be serialized by the caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use tunesync_storage::{create_pool_at, run_migrations, SearchCache};
//! use tunesync_core::SearchResult;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool_at(std::path::Path::new("tunesync.db")).await?;
//! run_migrations(&pool).await?;
//! let cache = SearchCache::from_pool(pool);
//!
//! match cache.search("Queen Greatest Hits").await {
//!     Ok(result) => println!("{} cached albums", result.album_items().len()),
//!     Err(e) if e.is_not_found() => println!("not cached yet"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tunesync_core::SearchResult;

use crate::error::{Result, StorageError};

/// A cached search as stored on disk
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCacheEntry {
    /// Raw query text
    pub query: String,
    /// When the entry was last written
    pub written_at: DateTime<Utc>,
    /// Decoded search result
    pub result: SearchResult,
}

/// Persistent search result cache
#[derive(Debug, Clone)]
pub struct SearchCache {
    pool: SqlitePool,
}

impl SearchCache {
    /// Open (or create) the cache database at `path` and apply migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated
    pub async fn open(path: &Path) -> Result<Self> {
        let pool = crate::create_pool_at(path).await?;
        crate::run_migrations(&pool).await?;

        tracing::info!(path = %path.display(), "Search cache opened");

        Ok(Self { pool })
    }

    /// Wrap an existing, already migrated pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool (for testing)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Store `result` as the cached answer for `query`
    ///
    /// Any previous entry for `query` is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database write fails
    pub async fn upsert(&self, query: &str, result: &SearchResult) -> Result<()> {
        let encoded = serde_json::to_string(result)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        let now = Utc::now().timestamp();

        tracing::debug!(query = %query, bytes = encoded.len(), "Caching search result");

        sqlx::query(
            "INSERT INTO searches (query, written_at, result)
             VALUES (?, ?, ?)
             ON CONFLICT(query) DO UPDATE SET written_at = excluded.written_at, result = excluded.result",
        )
        .bind(query)
        .bind(now)
        .bind(&encoded)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Look up the cached result for `query`
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if `query` was never cached, or a
    /// serialization error if the stored payload cannot be decoded
    pub async fn search(&self, query: &str) -> Result<SearchResult> {
        self.entry(query)
            .await?
            .map(|entry| entry.result)
            .ok_or_else(|| StorageError::not_found("Search", query))
    }

    /// Get the full cache entry for `query`, including when it was written
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored column cannot be
    /// decoded
    pub async fn entry(&self, query: &str) -> Result<Option<SearchCacheEntry>> {
        let row = sqlx::query("SELECT query, written_at, result FROM searches WHERE query = ?")
            .bind(query)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let written_at: i64 = row.try_get("written_at")?;
        let payload: String = row.try_get("result")?;
        let result: SearchResult = serde_json::from_str(&payload)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        Ok(Some(SearchCacheEntry {
            query: row.try_get("query")?,
            written_at: DateTime::from_timestamp(written_at, 0).unwrap_or_default(),
            result,
        }))
    }

    /// Number of cached queries
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn len(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM searches")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Whether the cache holds no entries
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Close the underlying pool, flushing pending writes
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
