//! Local album types

use serde::{Deserialize, Serialize};

/// An album found in the local library
///
/// One record is produced per `Artist/Album` directory pair. `tracks` keeps
/// the order in which the album directory was listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumMetadata {
    /// Artist directory name
    pub artist: String,
    /// Album directory name
    pub name: String,
    /// Track names derived from the album's entries
    pub tracks: Vec<String>,
}

impl AlbumMetadata {
    /// Create a new album record
    pub fn new(artist: impl Into<String>, name: impl Into<String>, tracks: Vec<String>) -> Self {
        Self {
            artist: artist.into(),
            name: name.into(),
            tracks,
        }
    }
}
