//! Error types for the importer

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] tunesync_core::SyncError),

    #[error("Album producer failed: {0}")]
    ProducerFailed(String),
}
