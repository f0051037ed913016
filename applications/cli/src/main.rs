/// tunesync - reconcile a local MP3 library with a streaming catalog
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunesync::{AppConfig, ReconciliationDriver, StdinConfirm};
use tunesync_catalog_client::{AuthServer, CatalogApiClient};
use tunesync_importer::{AlbumProducer, FsDirectoryLister};
use tunesync_storage::SearchCache;

#[derive(Parser)]
#[command(name = "tunesync")]
#[command(about = "Reconcile a local MP3 library with your saved albums", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path (defaults to ./tunesync.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Location of the MP3 library
    #[arg(short, long, global = true)]
    library: Option<PathBuf>,

    /// Search cache SQLite database
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add every local album to the catalog library
    Sync,
    /// List the albums found in the local library
    Scan,
    /// Search the catalog and pick albums to add
    Search {
        /// Free-text search terms
        #[arg(required = true, num_args = 1..)]
        terms: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.library, cli.cache, cli.debug);

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate()?;

    match cli.command {
        Commands::Sync => {
            sync(&config).await?;
        }
        Commands::Scan => {
            scan(&config).await?;
        }
        Commands::Search { terms } => {
            search(&config, &terms.join(" ")).await?;
        }
    }

    Ok(())
}

async fn sync(config: &AppConfig) -> anyhow::Result<()> {
    config.validate_credentials()?;

    // Start walking while the user logs in
    let albums = AlbumProducer::new(&config.library.path, FsDirectoryLister::new())
        .buffer_capacity(config.library.buffer_capacity)
        .start();

    let client = login(config).await?;
    let cache = SearchCache::open(&config.cache.path).await?;

    let mut driver = ReconciliationDriver::new(client, cache, StdinConfirm);
    let summary = driver.run(albums).await?;

    println!(
        "Done: {} albums, {} added, {} already in library, {} not found, {} skipped",
        summary.albums_seen, summary.added, summary.already_owned, summary.not_found, summary.declined
    );

    driver.cache().close().await;
    Ok(())
}

async fn scan(config: &AppConfig) -> anyhow::Result<()> {
    let mut albums = AlbumProducer::new(&config.library.path, FsDirectoryLister::new())
        .buffer_capacity(config.library.buffer_capacity)
        .start();

    while let Some(album) = albums.next().await {
        println!("{} / {}", album.artist, album.name);
        for track in &album.tracks {
            println!("    {}", track);
        }
    }

    let stats = albums.finish().await?;
    println!(
        "Found {} albums by {} artists ({} tracks, {} skipped entries, {} unreadable directories)",
        stats.albums, stats.artists, stats.tracks, stats.skipped_entries, stats.listing_failures
    );

    Ok(())
}

async fn search(config: &AppConfig, terms: &str) -> anyhow::Result<()> {
    config.validate_credentials()?;

    let client = login(config).await?;
    let cache = SearchCache::open(&config.cache.path).await?;

    let mut driver = ReconciliationDriver::new(client, cache, StdinConfirm);
    let added = driver.search_terms(terms).await?;
    println!("Added {} albums", added.len());

    driver.cache().close().await;
    Ok(())
}

async fn login(config: &AppConfig) -> anyhow::Result<CatalogApiClient> {
    let login = AuthServer::new(config.catalog_config(), config.auth_options())?
        .start()
        .await?;

    println!(
        "Please log in by visiting the following page in your browser: {}",
        login.auth_url()
    );

    // Wait for auth to complete
    let client = login.client().await?;

    let user = client.current_user().await?;
    println!("You are logged in as: {}", user.id);

    Ok(client)
}
