use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tunesync::{AppConfig, CliError};

fn env(vars: &[(&str, &str)]) -> config::Environment {
    let source: config::Map<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    AppConfig::environment().source(Some(source))
}

fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tunesync.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_file_values_loaded() {
    let (_dir, path) = write_config(
        r#"
        [library]
        path = "/srv/mp3"
        buffer_capacity = 5

        [cache]
        path = "/var/cache/tunesync.db"

        [catalog]
        client_id = "file-id"
        client_secret = "file-secret"

        [auth]
        port = 9090
        scopes = ["user-library-read"]
        "#,
    );

    let config = AppConfig::load_with_env(Some(&path), env(&[])).unwrap();

    assert_eq!(config.library.path, PathBuf::from("/srv/mp3"));
    assert_eq!(config.library.buffer_capacity, 5);
    assert_eq!(config.cache.path, PathBuf::from("/var/cache/tunesync.db"));
    assert_eq!(config.catalog.client_id, "file-id");
    assert_eq!(config.auth.port, 9090);
    assert_eq!(config.auth.scopes, vec!["user-library-read"]);
    // Untouched sections keep their defaults
    assert_eq!(config.auth.callback_path, "/callback");
    assert_eq!(config.catalog.accounts_url, "https://accounts.spotify.com");
    assert!(config.validate_credentials().is_ok());
}

#[test]
fn test_environment_overrides_file() {
    let (_dir, path) = write_config(
        r#"
        [catalog]
        client_id = "file-id"
        client_secret = "file-secret"
        "#,
    );

    let config = AppConfig::load_with_env(
        Some(&path),
        env(&[
            ("TUNESYNC_CATALOG__CLIENT_ID", "env-id"),
            ("TUNESYNC_LIBRARY__BUFFER_CAPACITY", "7"),
            ("TUNESYNC_AUTH__SCOPES", "user-library-read,user-library-modify,user-read-private"),
        ]),
    )
    .unwrap();

    assert_eq!(config.catalog.client_id, "env-id");
    assert_eq!(config.catalog.client_secret, "file-secret");
    assert_eq!(config.library.buffer_capacity, 7);
    assert_eq!(config.auth.scopes.len(), 3);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = AppConfig::load_with_env(Some(&dir.path().join("missing.toml")), env(&[]));

    assert!(matches!(result, Err(CliError::Config(_))));
}

#[test]
fn test_env_only() {
    let config = AppConfig::load_with_env(
        None,
        env(&[
            ("TUNESYNC_CATALOG__CLIENT_ID", "id"),
            ("TUNESYNC_CATALOG__CLIENT_SECRET", "secret"),
            ("TUNESYNC_CACHE__PATH", "/tmp/cache.db"),
        ]),
    )
    .unwrap();

    assert_eq!(config.cache.path, PathBuf::from("/tmp/cache.db"));
    assert_eq!(config.library.path, PathBuf::from("/usr/local/mp3"));
    assert!(config.validate().is_ok());
    assert!(config.validate_credentials().is_ok());

    let catalog = config.catalog_config();
    assert_eq!(catalog.client_id, "id");
    assert_eq!(catalog.api_url, "https://api.spotify.com/v1");

    let auth = config.auth_options();
    assert_eq!(auth.redirect_uri(), "http://127.0.0.1:8080/callback");
}
