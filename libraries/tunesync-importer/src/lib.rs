//! tunesync Importer
//!
//! This crate turns the local music library into album records and decides
//! which remote catalog album each one corresponds to.
//!
//! # Features
//!
//! - Concurrent `Artist/Album/Track` directory walk with a bounded hand-off
//! - Track name derivation from file names
//! - Name canonicalization for comparisons
//! - Tiered album matching (exact, then prefix in either direction)
//!
//! # Architecture
//!
//! - `scanner`: Album producer and track name rule
//! - `lister`: Filesystem `DirectoryLister`
//! - `canonical`: Comparison keys for display names
//! - `matcher`: Best match selection against catalog candidates

mod error;
mod types;

// Core modules
pub mod canonical;
pub mod lister;
pub mod matcher;
pub mod scanner;

pub use canonical::canonicalize_name;
pub use error::ImportError;
pub use lister::FsDirectoryLister;
pub use matcher::best_match;
pub use scanner::{extract_track_name, AlbumProducer, AlbumStream};
pub use types::*;

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, ImportError>;
