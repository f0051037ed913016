//! Remote catalog types
//!
//! These mirror the JSON the catalog returns, so a search result can be
//! cached verbatim and decoded back into the same structure.

use super::AlbumId;
use serde::{Deserialize, Serialize};

/// Kinds of entity a search can return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Artists
    Artist,
    /// Albums
    Album,
}

impl SearchType {
    /// Name used in the catalog's `type` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Artist => "artist",
            SearchType::Album => "album",
        }
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total items across all pages
    #[serde(default)]
    pub total: u32,
    /// Requested page size
    #[serde(default)]
    pub limit: u32,
    /// Index of the first item on this page
    #[serde(default)]
    pub offset: u32,
    /// URL of the next page, if any
    #[serde(default)]
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// A single page holding every item
    pub fn of(items: Vec<T>) -> Self {
        let total = items.len() as u32;
        Self {
            items,
            total,
            limit: total,
            offset: 0,
            next: None,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::of(Vec::new())
    }
}

/// Artist as embedded in album listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleArtist {
    /// Catalog artist id
    #[serde(default)]
    pub id: String,
    /// Display name
    pub name: String,
}

impl SimpleArtist {
    /// Create an artist reference
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Artist as returned by artist searches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullArtist {
    /// Catalog artist id
    #[serde(default)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Genres the catalog assigns to the artist
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Album summary as returned by searches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleAlbum {
    /// Catalog album id
    pub id: AlbumId,
    /// Album title
    pub name: String,
    /// Credited artists, primary first
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    /// `album`, `single` or `compilation`
    #[serde(default)]
    pub album_type: Option<String>,
    /// Release date as the catalog reports it
    #[serde(default)]
    pub release_date: Option<String>,
    /// Number of tracks on the album
    #[serde(default)]
    pub total_tracks: Option<u32>,
}

impl SimpleAlbum {
    /// Create an album summary with only the required fields
    pub fn new(id: impl Into<String>, name: impl Into<String>, artists: Vec<SimpleArtist>) -> Self {
        Self {
            id: AlbumId::new(id),
            name: name.into(),
            artists,
            album_type: None,
            release_date: None,
            total_tracks: None,
        }
    }

    /// Name of the first credited artist, if any
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(|a| a.name.as_str())
    }
}

/// Track summary as embedded in a full album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTrack {
    /// Catalog track id
    #[serde(default)]
    pub id: Option<String>,
    /// Track title
    pub name: String,
    /// Position on its disc
    #[serde(default)]
    pub track_number: Option<u32>,
    /// Length in milliseconds
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

/// Album with its track listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullAlbum {
    /// Catalog album id
    pub id: AlbumId,
    /// Album title
    pub name: String,
    /// Credited artists
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    /// First page of the track listing
    #[serde(default)]
    pub tracks: Page<SimpleTrack>,
}

/// Payload of a catalog search
///
/// Each section is absent when its kind was not requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matching albums
    #[serde(default)]
    pub albums: Option<Page<SimpleAlbum>>,
    /// Matching artists
    #[serde(default)]
    pub artists: Option<Page<FullArtist>>,
}

impl SearchResult {
    /// Albums in the result, empty when the album section is missing
    pub fn album_items(&self) -> &[SimpleAlbum] {
        self.albums.as_ref().map_or(&[], |page| page.items.as_slice())
    }
}
