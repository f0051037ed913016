/// Application configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tunesync_catalog_client::{AuthOptions, CatalogConfig, DEFAULT_ACCOUNTS_URL, DEFAULT_API_URL};

/// Config file picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "tunesync.toml";

/// Prefix of environment variable overrides (`TUNESYNC_CACHE__PATH=...`)
pub const ENV_PREFIX: &str = "TUNESYNC";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_library")]
    pub library: LibrarySettings,

    #[serde(default = "default_cache")]
    pub cache: CacheSettings,

    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    #[serde(default = "default_library_path")]
    pub path: PathBuf,

    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default = "default_bind_host")]
    pub bind_host: String,

    #[serde(default = "default_redirect_host")]
    pub redirect_host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_callback_path")]
    pub callback_path: String,

    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `tunesync.toml` is read when
    /// present in the working directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Self::environment())
    }

    /// Load configuration from file and the given environment source
    pub fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with TUNESYNC_)
        settings = settings.add_source(env);

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Environment source for `TUNESYNC_*` variables
    ///
    /// Nested keys use a double underscore so multi-word keys survive:
    /// `TUNESYNC_LIBRARY__BUFFER_CAPACITY` sets `library.buffer_capacity`.
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("auth.scopes")
    }

    /// Apply command line overrides
    pub fn apply_overrides(&mut self, library: Option<PathBuf>, cache: Option<PathBuf>, debug: bool) {
        if let Some(library) = library {
            self.library.path = library;
        }
        if let Some(cache) = cache {
            self.cache.path = cache;
        }
        if debug {
            self.debug = true;
        }
    }

    /// Validate settings every command relies on
    pub fn validate(&self) -> Result<()> {
        if self.library.buffer_capacity == 0 {
            return Err(CliError::Config(
                "library.buffer_capacity must be at least 1".to_string(),
            ));
        }

        if !self.auth.callback_path.starts_with('/') {
            return Err(CliError::Config(format!(
                "auth.callback_path must start with '/': {}",
                self.auth.callback_path
            )));
        }

        Ok(())
    }

    /// Validate the catalog credentials needed by `sync` and `search`
    pub fn validate_credentials(&self) -> Result<()> {
        if self.catalog.client_id.trim().is_empty() {
            return Err(CliError::Config(
                "Catalog client id is required (set TUNESYNC_CATALOG__CLIENT_ID)".to_string(),
            ));
        }

        if self.catalog.client_secret.trim().is_empty() {
            return Err(CliError::Config(
                "Catalog client secret is required (set TUNESYNC_CATALOG__CLIENT_SECRET)".to_string(),
            ));
        }

        Ok(())
    }

    /// Tracing filter used when `RUST_LOG` is not set
    pub fn log_filter(&self) -> String {
        let level = if self.debug { "debug" } else { "info" };
        ["tunesync", "tunesync_importer", "tunesync_storage", "tunesync_catalog_client"]
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig::new(&self.catalog.client_id, &self.catalog.client_secret)
            .with_urls(&self.catalog.api_url, &self.catalog.accounts_url)
    }

    pub fn auth_options(&self) -> AuthOptions {
        AuthOptions {
            bind_host: self.auth.bind_host.clone(),
            redirect_host: self.auth.redirect_host.clone(),
            port: self.auth.port,
            callback_path: self.auth.callback_path.clone(),
            scopes: self.auth.scopes.clone(),
        }
    }
}

// Default values
fn default_library() -> LibrarySettings {
    LibrarySettings {
        path: default_library_path(),
        buffer_capacity: default_buffer_capacity(),
    }
}

fn default_library_path() -> PathBuf {
    PathBuf::from("/usr/local/mp3")
}

fn default_buffer_capacity() -> usize {
    tunesync_importer::DEFAULT_BUFFER_CAPACITY
}

fn default_cache() -> CacheSettings {
    CacheSettings {
        path: default_cache_path(),
    }
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./tunesync.db")
}

fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        client_id: String::new(),
        client_secret: String::new(),
        api_url: default_api_url(),
        accounts_url: default_accounts_url(),
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_accounts_url() -> String {
    DEFAULT_ACCOUNTS_URL.to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        bind_host: default_bind_host(),
        redirect_host: default_redirect_host(),
        port: default_port(),
        callback_path: default_callback_path(),
        scopes: default_scopes(),
    }
}

fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

fn default_redirect_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_callback_path() -> String {
    "/callback".to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "user-library-read".to_string(),
        "user-library-modify".to_string(),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            library: default_library(),
            cache: default_cache(),
            catalog: default_catalog(),
            auth: default_auth(),
        }
    }
}
