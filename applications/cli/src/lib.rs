//! tunesync Library
//!
//! Reconciles a local `Artist/Album/Track` MP3 library with a user's saved
//! albums on a remote streaming catalog.
//!
//! This library exposes the application components for testing purposes.

pub mod config;
pub mod driver;
pub mod error;
pub mod prompt;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use driver::{AlbumOutcome, ReconcileSummary, ReconciliationDriver};
pub use error::{CliError, Result};
pub use prompt::{Confirm, StdinConfirm};
