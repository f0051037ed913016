//! Types for catalog configuration, login and account responses.

use serde::{Deserialize, Serialize};

/// Default catalog Web API base URL
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Default accounts service base URL (authorize and token endpoints)
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Application credentials and endpoints for the remote catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// OAuth client id of the registered application
    pub client_id: String,
    /// OAuth client secret of the registered application
    pub client_secret: String,
    /// Base URL of the Web API (e.g. "https://api.spotify.com/v1")
    pub api_url: String,
    /// Base URL of the accounts service
    pub accounts_url: String,
}

impl CatalogConfig {
    /// Create a config pointing at the default endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_url: DEFAULT_API_URL.to_string(),
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
        }
    }

    /// Override both endpoints (e.g. for a mock server).
    pub fn with_urls(mut self, api_url: impl Into<String>, accounts_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self.accounts_url = accounts_url.into();
        self
    }
}

/// Options for the one-shot OAuth callback listener.
#[derive(Debug, Clone)]
pub struct AuthOptions {
    /// Address the listener binds to
    pub bind_host: String,
    /// Host name placed in the redirect URI the browser is sent back to
    pub redirect_host: String,
    /// Listener port (0 picks a free port)
    pub port: u16,
    /// Path of the callback route, starting with `/`
    pub callback_path: String,
    /// Scopes requested from the user
    pub scopes: Vec<String>,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            redirect_host: "127.0.0.1".to_string(),
            port: 8080,
            callback_path: "/callback".to_string(),
            scopes: vec![
                "user-library-read".to_string(),
                "user-library-modify".to_string(),
            ],
        }
    }
}

impl AuthOptions {
    /// Redirect URI registered with the provider
    pub fn redirect_uri(&self) -> String {
        format!(
            "http://{}:{}{}",
            self.redirect_host, self.port, self.callback_path
        )
    }
}

// =============================================================================
// Login Types
// =============================================================================

/// Query parameters the provider appends to the redirect.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Response from the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Token validity in seconds
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

// =============================================================================
// Account Types
// =============================================================================

/// The authenticated user's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Error body the Web API returns for failed requests.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
}
