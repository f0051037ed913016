//! Error types for the catalog client.

use thiserror::Error;

/// Errors that can occur when talking to the remote catalog.
#[derive(Error, Debug)]
pub enum CatalogClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Catalog returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Access token missing, expired or revoked
    #[error("Authentication required")]
    AuthRequired,

    /// Login was refused by the provider or the token exchange failed
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// OAuth callback carried a state that this login never issued
    #[error("OAuth state mismatch")]
    StateMismatch,

    /// Invalid catalog or accounts URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse a catalog response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Rate limited by the catalog
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// IO error (binding the callback listener)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for catalog client operations.
pub type Result<T> = std::result::Result<T, CatalogClientError>;

impl From<CatalogClientError> for tunesync_core::SyncError {
    fn from(err: CatalogClientError) -> Self {
        match err {
            CatalogClientError::Io(e) => tunesync_core::SyncError::Io(e),
            other => tunesync_core::SyncError::catalog(other.to_string()),
        }
    }
}
