//! tunesync Catalog Client
//!
//! HTTP client for the remote music catalog's Web API, plus the OAuth
//! login that produces an authenticated client.
//!
//! # Features
//!
//! - **Login**: authorization-code flow with a one-shot local callback listener
//! - **Search**: free-text album and artist search
//! - **Library**: check and add saved albums for the current user
//!
//! # Example
//!
//! ```ignore
//! use tunesync_catalog_client::{AuthOptions, AuthServer, CatalogConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CatalogConfig::new("client-id", "client-secret");
//!     let login = AuthServer::new(config, AuthOptions::default())?.start().await?;
//!
//!     println!("Please log in: {}", login.auth_url());
//!     let client = login.client().await?;
//!
//!     let me = client.current_user().await?;
//!     println!("Logged in as {}", me.id);
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod error;
mod types;

// Re-export main types
pub use auth::{AuthHandoff, AuthServer, TokenClient};
pub use client::CatalogApiClient;
pub use error::{CatalogClientError, Result};
pub use types::{
    AuthOptions, CallbackParams, CatalogConfig, TokenResponse, UserProfile, DEFAULT_ACCOUNTS_URL,
    DEFAULT_API_URL,
};
