//! Core traits for tunesync

use crate::error::Result;
use crate::types::{AlbumId, DirectoryEntry, FullAlbum, SearchResult, SearchType};
use async_trait::async_trait;
use std::path::Path;

/// Directory listing capability
///
/// Implementers list the immediate entries of a directory. The album producer
/// only ever talks to the library through this trait, so tests can script
/// listings and failures without touching the filesystem.
pub trait DirectoryLister: Send + Sync {
    /// List the entries of `path`, in the order they should be visited
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read
    fn list(&self, path: &Path) -> Result<Vec<DirectoryEntry>>;
}

/// Remote catalog operations
///
/// Implementers talk to the remote music catalog on behalf of an
/// authenticated user.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Free-text search restricted to the given result kinds
    async fn search(&self, query: &str, kinds: &[SearchType]) -> Result<SearchResult>;

    /// Fetch a single album including its track listing
    async fn fetch_album(&self, id: &AlbumId) -> Result<FullAlbum>;

    /// Check whether each album is already saved in the user's library
    ///
    /// The returned flags are in the same order as `ids`.
    async fn user_has_albums(&self, ids: &[AlbumId]) -> Result<Vec<bool>>;

    /// Save albums to the user's library
    async fn add_albums_to_library(&self, ids: &[AlbumId]) -> Result<()>;
}
