//! OAuth authorization-code login with a one-shot local callback listener.
//!
//! [`AuthServer::start`] binds the callback listener and returns an
//! [`AuthHandoff`]. The user opens [`AuthHandoff::auth_url`] in a browser,
//! the provider redirects back to the listener, and the first callback
//! decides the outcome: its code is exchanged for a token and the resulting
//! client is handed to whoever awaits [`AuthHandoff::client`]. Every later
//! callback is answered with `410 Gone`.

use crate::client::{build_http_client, normalize_url, CatalogApiClient};
use crate::error::{CatalogClientError, Result};
use crate::types::{AuthOptions, CallbackParams, CatalogConfig, TokenResponse};
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::routing::get;
use axum::Router;
use reqwest::Client;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

type Handoff = oneshot::Sender<Result<CatalogApiClient>>;

/// Token endpoint client for the accounts service.
pub struct TokenClient<'a> {
    http: &'a Client,
    config: &'a CatalogConfig,
}

impl<'a> TokenClient<'a> {
    pub fn new(http: &'a Client, config: &'a CatalogConfig) -> Self {
        Self { http, config }
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<TokenResponse> {
        let url = format!("{}/api/token", normalize_url(&self.config.accounts_url)?);
        debug!(url = %url, "Exchanging authorization code");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let token: TokenResponse = response.json().await.map_err(|e| {
                CatalogClientError::ParseError(format!("Failed to parse token response: {}", e))
            })?;

            debug!(expires_in = token.expires_in, "Token exchange successful");
            Ok(token)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Token exchange failed");
            Err(CatalogClientError::AuthFailed(format!(
                "Token endpoint returned {}: {}",
                status.as_u16(),
                error_text
            )))
        }
    }
}

/// A login that has not started listening yet.
#[derive(Debug, Clone)]
pub struct AuthServer {
    config: CatalogConfig,
    options: AuthOptions,
    state: String,
}

impl AuthServer {
    /// Prepare a login with a fresh random `state`.
    pub fn new(config: CatalogConfig, options: AuthOptions) -> Result<Self> {
        normalize_url(&config.api_url)?;
        normalize_url(&config.accounts_url)?;

        if !options.callback_path.starts_with('/') {
            return Err(CatalogClientError::InvalidUrl(format!(
                "Callback path must start with '/': {}",
                options.callback_path
            )));
        }

        Ok(Self {
            config,
            options,
            state: uuid::Uuid::new_v4().simple().to_string(),
        })
    }

    /// The `state` value this login will accept.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// URL the user must open to grant access.
    pub fn auth_url(&self) -> Result<String> {
        let base = normalize_url(&self.config.accounts_url)?;
        let mut url = url::Url::parse(&format!("{}/authorize", base))
            .map_err(|e| CatalogClientError::InvalidUrl(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.options.redirect_uri())
            .append_pair("scope", &self.options.scopes.join(" "))
            .append_pair("state", &self.state);

        Ok(url.to_string())
    }

    /// Bind the callback listener and start serving in the background.
    pub async fn start(self) -> Result<AuthHandoff> {
        let auth_url = self.auth_url()?;
        let bind_addr = format!("{}:{}", self.options.bind_host, self.options.port);
        let listener = TcpListener::bind(&bind_addr).await?;
        let local_addr = listener.local_addr()?;

        let (tx, rx) = oneshot::channel();
        let callback = Arc::new(CallbackState {
            http: build_http_client()?,
            config: self.config,
            redirect_uri: self.options.redirect_uri(),
            state: self.state.clone(),
            handoff: Mutex::new(Some(tx)),
        });

        let app = Router::new()
            .route(&self.options.callback_path, get(complete_auth))
            .fallback(unknown_route)
            .with_state(callback)
            .layer(TraceLayer::new_for_http());

        info!(addr = %local_addr, path = %self.options.callback_path, "OAuth callback listener started");

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                warn!("OAuth callback listener stopped: {}", e);
            }
        });

        Ok(AuthHandoff {
            auth_url,
            state: self.state,
            local_addr,
            rx,
            server,
        })
    }
}

/// A running login waiting for its callback.
///
/// Dropping the hand-off stops the listener.
pub struct AuthHandoff {
    auth_url: String,
    state: String,
    local_addr: SocketAddr,
    rx: oneshot::Receiver<Result<CatalogApiClient>>,
    server: JoinHandle<()>,
}

impl AuthHandoff {
    /// URL the user must open to grant access.
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// The `state` value this login will accept.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Address the callback listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the callback and return the authenticated client.
    ///
    /// The listener is stopped once the callback has been handled.
    pub async fn client(mut self) -> Result<CatalogApiClient> {
        let outcome = (&mut self.rx).await.unwrap_or_else(|_| {
            Err(CatalogClientError::AuthFailed(
                "Callback listener stopped before login completed".into(),
            ))
        });
        self.server.abort();

        if outcome.is_ok() {
            info!("Login completed");
        }
        outcome
    }
}

impl Drop for AuthHandoff {
    fn drop(&mut self) {
        self.server.abort();
    }
}

struct CallbackState {
    http: Client,
    config: CatalogConfig,
    redirect_uri: String,
    state: String,
    handoff: Mutex<Option<Handoff>>,
}

impl CallbackState {
    fn take_handoff(&self) -> Option<Handoff> {
        self.handoff.lock().ok().and_then(|mut slot| slot.take())
    }

    async fn authenticate(&self, params: CallbackParams) -> Result<CatalogApiClient> {
        if params.state.as_deref() != Some(self.state.as_str()) {
            warn!(got = ?params.state, "OAuth state mismatch");
            return Err(CatalogClientError::StateMismatch);
        }

        if let Some(error) = params.error {
            warn!(error = %error, "Provider refused login");
            return Err(CatalogClientError::AuthFailed(error));
        }

        let code = params
            .code
            .ok_or_else(|| CatalogClientError::AuthFailed("Callback carried no code".into()))?;

        let token = TokenClient::new(&self.http, &self.config)
            .exchange_code(&code, &self.redirect_uri)
            .await?;

        CatalogApiClient::new(&self.config.api_url, token.access_token)
    }
}

async fn complete_auth(
    State(callback): State<Arc<CallbackState>>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, String) {
    let Some(handoff) = callback.take_handoff() else {
        return (StatusCode::GONE, "Login already handled".to_string());
    };

    let outcome = callback.authenticate(params).await;
    let response = match &outcome {
        Ok(_) => (StatusCode::OK, "Login Completed!".to_string()),
        Err(CatalogClientError::StateMismatch) => (StatusCode::NOT_FOUND, "Not Found".to_string()),
        Err(_) => (StatusCode::FORBIDDEN, "Couldn't get token".to_string()),
    };

    let outcome = outcome.map_err(|e| match e {
        e @ (CatalogClientError::StateMismatch | CatalogClientError::AuthFailed(_)) => e,
        other => CatalogClientError::AuthFailed(other.to_string()),
    });

    if handoff.send(outcome).is_err() {
        debug!("Nobody is waiting for the login anymore");
    }

    response
}

async fn unknown_route(uri: Uri) -> StatusCode {
    debug!(uri = %uri, "Got request for unknown route");
    StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> AuthServer {
        AuthServer::new(CatalogConfig::new("my-client", "my-secret"), AuthOptions::default()).unwrap()
    }

    #[test]
    fn test_state_is_random() {
        assert_ne!(server().state(), server().state());
        assert!(!server().state().is_empty());
    }

    #[test]
    fn test_auth_url() {
        let server = server();
        let url = url::Url::parse(&server.auth_url().unwrap()).unwrap();

        assert_eq!(url.host_str(), Some("accounts.spotify.com"));
        assert_eq!(url.path(), "/authorize");

        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["client_id"], "my-client");
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["redirect_uri"], "http://127.0.0.1:8080/callback");
        assert_eq!(pairs["scope"], "user-library-read user-library-modify");
        assert_eq!(pairs["state"], server.state());
    }

    #[test]
    fn test_rejects_relative_callback_path() {
        let options = AuthOptions {
            callback_path: "callback".to_string(),
            ..AuthOptions::default()
        };
        let result = AuthServer::new(CatalogConfig::new("id", "secret"), options);
        assert!(matches!(result, Err(CatalogClientError::InvalidUrl(_))));
    }
}
