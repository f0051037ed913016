//! tunesync Core
//!
//! Shared domain types, traits, and error handling for the tunesync workspace.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `AlbumMetadata` for local albums, `SearchResult`,
//!   `SimpleAlbum` and `FullAlbum` for remote catalog entries
//! - **Core Traits**: `DirectoryLister` (local library access) and
//!   `CatalogClient` (remote catalog access)
//! - **Error Handling**: Unified `SyncError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tunesync_core::types::{AlbumMetadata, SimpleAlbum, SimpleArtist};
//!
//! let local = AlbumMetadata::new("Queen", "Greatest Hits", vec!["Bohemian Rhapsody".to_string()]);
//! let remote = SimpleAlbum::new("4KJ5", "Greatest Hits", vec![SimpleArtist::new("1dfe", "Queen")]);
//!
//! assert_eq!(local.name, remote.name);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SyncError};
pub use traits::{CatalogClient, DirectoryLister};

pub use types::{
    AlbumId, AlbumMetadata, DirectoryEntry, FullAlbum, FullArtist, Page, SearchResult, SearchType,
    SimpleAlbum, SimpleArtist, SimpleTrack,
};
