/// Application error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] tunesync_storage::StorageError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] tunesync_catalog_client::CatalogClientError),

    #[error(transparent)]
    Core(#[from] tunesync_core::SyncError),

    #[error("Library scan error: {0}")]
    Import(#[from] tunesync_importer::ImportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
