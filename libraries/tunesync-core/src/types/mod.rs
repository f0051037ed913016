//! Domain types shared across the workspace

mod album;
mod catalog;
mod directory;
mod ids;

pub use album::AlbumMetadata;
pub use catalog::{
    FullAlbum, FullArtist, Page, SearchResult, SearchType, SimpleAlbum, SimpleArtist, SimpleTrack,
};
pub use directory::DirectoryEntry;
pub use ids::AlbumId;
