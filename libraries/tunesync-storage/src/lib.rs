//! tunesync Storage
//!
//! `SQLite` persistence for tunesync.
//!
//! The only thing persisted today is the search cache: the last catalog
//! search result for each free-text query, so repeated runs over the same
//! library do not hit the network again.
//!
//! # Example
//!
//! ```rust,no_run
//! use tunesync_storage::SearchCache;
//! use tunesync_core::SearchResult;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = SearchCache::open(Path::new("tunesync.db")).await?;
//!
//! cache.upsert("Queen Greatest Hits", &SearchResult::default()).await?;
//! let cached = cache.search("Queen Greatest Hits").await?;
//! # Ok(())
//! # }
//! ```

mod error;

pub mod search_cache;

pub use error::{Result, StorageError};
pub use search_cache::{SearchCache, SearchCacheEntry};

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool from a connection string
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://tunesync.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> std::result::Result<SqlitePool, sqlx::Error> {
    tracing::debug!(url = %database_url, "Creating SQLite pool");
    connect(SqliteConnectOptions::from_str(database_url)?).await
}

/// Create a new `SQLite` pool backed by the file at `path`
///
/// The file is created if it does not exist yet.
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool_at(path: &Path) -> std::result::Result<SqlitePool, sqlx::Error> {
    tracing::debug!(path = %path.display(), "Creating SQLite pool");
    connect(SqliteConnectOptions::new().filename(path)).await
}

async fn connect(options: SqliteConnectOptions) -> std::result::Result<SqlitePool, sqlx::Error> {
    let options = options
        .create_if_missing(true) // Create database file if it doesn't exist
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(30)); // Wait up to 30s for locks

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool ready");

    Ok(pool)
}
