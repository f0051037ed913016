//! Common types for the importer

use serde::{Deserialize, Serialize};
use tunesync_core::SimpleAlbum;

/// Default number of album records buffered between producer and consumer
pub const DEFAULT_BUFFER_CAPACITY: usize = 20;

/// Statistics from one library walk
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Artist directories visited
    pub artists: usize,

    /// Album records handed to the consumer
    pub albums: usize,

    /// Track entries across all emitted albums
    pub tracks: usize,

    /// Non-directory entries skipped at the artist or album level
    pub skipped_entries: usize,

    /// Directories that could not be listed (root included)
    pub listing_failures: usize,

    /// Whether the consumer went away before the walk finished
    pub stopped_early: bool,
}

/// How confidently a catalog album matched a local one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// No candidate matched
    Unknown,

    /// Album and artist keys are identical
    Exact,

    /// Catalog names extend the local names (e.g. "Greatest Hits (Remastered)")
    SourcePrefix,

    /// The local album name extends the catalog album name
    DestPrefix,
}

impl MatchTier {
    /// Whether the match is strong enough to act on without asking
    pub fn is_exact(self) -> bool {
        self == MatchTier::Exact
    }
}

/// Result of matching a local album against catalog candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestMatch<'a> {
    /// The chosen candidate, `None` when `tier` is `Unknown`
    pub album: Option<&'a SimpleAlbum>,

    /// Tier that produced the match
    pub tier: MatchTier,
}

impl<'a> BestMatch<'a> {
    pub(crate) fn found(album: &'a SimpleAlbum, tier: MatchTier) -> Self {
        Self {
            album: Some(album),
            tier,
        }
    }

    pub(crate) fn unknown() -> Self {
        Self {
            album: None,
            tier: MatchTier::Unknown,
        }
    }
}
