//! Authenticated Web API client.

use crate::error::{CatalogClientError, Result};
use crate::types::{ApiErrorBody, UserProfile};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use tunesync_core::{AlbumId, CatalogClient, FullAlbum, SearchResult, SearchType};

/// Used when a 429 response carries no usable `Retry-After` header
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Client for the catalog Web API, acting on behalf of one user.
///
/// Rate limiting is reported as [`CatalogClientError::RateLimited`] and
/// never retried here.
///
/// # Example
///
/// ```ignore
/// use tunesync_catalog_client::CatalogApiClient;
/// use tunesync_core::{CatalogClient, SearchType};
///
/// let client = CatalogApiClient::new("https://api.spotify.com/v1", access_token)?;
/// let me = client.current_user().await?;
/// println!("Logged in as {}", me.id);
///
/// let result = client.search("Queen Greatest Hits", &[SearchType::Album]).await?;
/// println!("Found {} albums", result.album_items().len());
/// ```
#[derive(Clone)]
pub struct CatalogApiClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl std::fmt::Debug for CatalogApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogApiClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl CatalogApiClient {
    /// Create a client for the API at `api_url` using `access_token`.
    pub fn new(api_url: &str, access_token: impl Into<String>) -> Result<Self> {
        let api_url = normalize_url(api_url)?;

        Ok(Self {
            http: build_http_client()?,
            api_url,
            access_token: access_token.into(),
        })
    }

    /// Get the normalized API base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch the profile of the authenticated user.
    pub async fn current_user(&self) -> Result<UserProfile> {
        let url = format!("{}/me", self.api_url);
        let profile: UserProfile = self.send_json(self.http.get(&url), "user profile").await?;

        info!(user = %profile.id, "Authenticated as catalog user");
        Ok(profile)
    }

    /// Free-text search restricted to `kinds`.
    pub async fn search_catalog(&self, query: &str, kinds: &[SearchType]) -> Result<SearchResult> {
        let url = format!("{}/search", self.api_url);
        let types = kinds
            .iter()
            .map(SearchType::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let request = self
            .http
            .get(&url)
            .query(&[("q", query), ("type", types.as_str())]);
        let result: SearchResult = self.send_json(request, "search").await?;

        debug!(
            query = %query,
            albums = result.album_items().len(),
            "Search complete"
        );

        Ok(result)
    }

    /// Fetch one album with its tracks.
    pub async fn album(&self, id: &AlbumId) -> Result<FullAlbum> {
        let url = format!("{}/albums/{}", self.api_url, id);
        self.send_json(self.http.get(&url), "album").await
    }

    /// Check which albums are saved in the user's library.
    ///
    /// The flags come back in the order of `ids`.
    pub async fn saved_albums_contain(&self, ids: &[AlbumId]) -> Result<Vec<bool>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/me/albums/contains", self.api_url);
        let request = self.http.get(&url).query(&[("ids", join_ids(ids))]);
        let flags: Vec<bool> = self.send_json(request, "saved albums check").await?;

        if flags.len() != ids.len() {
            return Err(CatalogClientError::ParseError(format!(
                "Expected {} saved-album flags, got {}",
                ids.len(),
                flags.len()
            )));
        }

        Ok(flags)
    }

    /// Save albums to the user's library.
    pub async fn save_albums(&self, ids: &[AlbumId]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let url = format!("{}/me/albums", self.api_url);
        let request = self.http.put(&url).query(&[("ids", join_ids(ids))]);
        self.send(request).await?;

        info!(count = ids.len(), "Saved albums to library");
        Ok(())
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = self.send(request).await?;
        response.json().await.map_err(|e| {
            CatalogClientError::ParseError(format!("Failed to parse {} response: {}", what, e))
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.bearer_auth(&self.access_token).send().await?;
        let status = response.status();

        debug!(
            path = %response.url().path(),
            status = status.as_u16(),
            "Catalog round trip"
        );

        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(CatalogClientError::AuthRequired),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                warn!(retry_after_secs, "Rate limited by catalog");
                Err(CatalogClientError::RateLimited { retry_after_secs })
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorBody>(&body)
                    .map(|b| b.error.message)
                    .unwrap_or(body);
                Err(CatalogClientError::ServerError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl CatalogClient for CatalogApiClient {
    async fn search(&self, query: &str, kinds: &[SearchType]) -> tunesync_core::Result<SearchResult> {
        Ok(self.search_catalog(query, kinds).await?)
    }

    async fn fetch_album(&self, id: &AlbumId) -> tunesync_core::Result<FullAlbum> {
        Ok(self.album(id).await?)
    }

    async fn user_has_albums(&self, ids: &[AlbumId]) -> tunesync_core::Result<Vec<bool>> {
        Ok(self.saved_albums_contain(ids).await?)
    }

    async fn add_albums_to_library(&self, ids: &[AlbumId]) -> tunesync_core::Result<()> {
        Ok(self.save_albums(ids).await?)
    }
}

/// Validate a base URL and strip any trailing slash.
pub(crate) fn normalize_url(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(CatalogClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let url = raw.trim_end_matches('/').to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CatalogClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    url::Url::parse(&url).map_err(|e| CatalogClientError::InvalidUrl(format!("{}: {}", url, e)))?;

    Ok(url)
}

pub(crate) fn build_http_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("tunesync/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(CatalogClientError::Request)
}

fn join_ids(ids: &[AlbumId]) -> String {
    ids.iter().map(AlbumId::as_str).collect::<Vec<_>>().join(",")
}
