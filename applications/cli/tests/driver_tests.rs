use tunesync::{AlbumOutcome, CliError, ReconciliationDriver};
use tunesync_core::{AlbumMetadata, DirectoryEntry, DirectoryLister, SearchResult};
use tunesync_importer::AlbumProducer;

use test_helpers::{album, albums_result, CatalogCall, FakeCatalog, ScriptedConfirm, TestCache};

fn queen(name: &str) -> AlbumMetadata {
    AlbumMetadata::new("Queen", name, vec!["Track One".to_string()])
}

// ============================================================================
// Cache-or-network search
// ============================================================================

#[tokio::test]
async fn test_miss_searches_catalog_and_fills_cache() {
    let test_cache = TestCache::new().await;
    let result = albums_result(vec![album("gh", "Greatest Hits", "Queen")]);
    let catalog = FakeCatalog::new().with_result("Queen Greatest Hits", result.clone());

    let driver = ReconciliationDriver::new(catalog, test_cache.cache.clone(), ScriptedConfirm::default());
    let found = driver.search_with_cache("Queen Greatest Hits").await.unwrap();

    assert_eq!(found, result);
    assert_eq!(driver.catalog().searches(), 1);
    assert_eq!(test_cache.cache.search("Queen Greatest Hits").await.unwrap(), result);
}

#[tokio::test]
async fn test_hit_skips_catalog() {
    let test_cache = TestCache::new().await;
    let cached = albums_result(vec![album("gh", "Greatest Hits", "Queen")]);
    test_cache.cache.upsert("Queen Greatest Hits", &cached).await.unwrap();

    let driver = ReconciliationDriver::new(FakeCatalog::new(), test_cache.cache.clone(), ScriptedConfirm::default());
    let found = driver.search_with_cache("Queen Greatest Hits").await.unwrap();

    assert_eq!(found, cached);
    assert_eq!(driver.catalog().searches(), 0);
}

#[tokio::test]
async fn test_cached_empty_result_is_a_hit() {
    let test_cache = TestCache::new().await;
    test_cache.cache.upsert("Nobody Nothing", &SearchResult::default()).await.unwrap();

    let driver = ReconciliationDriver::new(FakeCatalog::new(), test_cache.cache.clone(), ScriptedConfirm::default());
    let found = driver.search_with_cache("Nobody Nothing").await.unwrap();

    assert!(found.album_items().is_empty());
    assert_eq!(driver.catalog().searches(), 0);
}

#[tokio::test]
async fn test_corrupt_cache_entry_falls_back_to_catalog() {
    let test_cache = TestCache::new().await;
    corrupt_entry(&test_cache, "Queen Jazz").await;

    let result = albums_result(vec![album("jz", "Jazz", "Queen")]);
    let catalog = FakeCatalog::new().with_result("Queen Jazz", result.clone());

    let driver = ReconciliationDriver::new(catalog, test_cache.cache.clone(), ScriptedConfirm::default());
    let found = driver.search_with_cache("Queen Jazz").await.unwrap();

    assert_eq!(found, result);
    assert_eq!(driver.catalog().searches(), 1);
    // Overwritten with a readable payload
    assert_eq!(test_cache.cache.search("Queen Jazz").await.unwrap(), result);
}

async fn corrupt_entry(test_cache: &TestCache, query: &str) {
    test_cache.cache.upsert(query, &SearchResult::default()).await.unwrap();
    sqlx::query("UPDATE searches SET result = ? WHERE query = ?")
        .bind("{not json")
        .bind(query)
        .execute(test_cache.cache.pool())
        .await
        .unwrap();
}

// ============================================================================
// Per-album reconciliation
// ============================================================================

#[tokio::test]
async fn test_exact_match_added_without_prompt() {
    let test_cache = TestCache::new().await;
    let catalog = FakeCatalog::new().with_result(
        "Queen Greatest Hits",
        albums_result(vec![album("gh2", "Greatest Hits II", "Queen"), album("gh", "Greatest Hits", "Queen")]),
    );

    let mut driver = ReconciliationDriver::new(catalog, test_cache.cache.clone(), ScriptedConfirm::default());
    let outcome = driver.reconcile_album(&queen("Greatest Hits")).await.unwrap();

    assert_eq!(outcome, AlbumOutcome::Added);
    let (catalog, _, confirm) = driver.into_parts();
    assert_eq!(catalog.added(), vec!["gh"]);
    assert_eq!(confirm.asked, 0);
}

#[tokio::test]
async fn test_leading_the_is_dropped_from_query() {
    let test_cache = TestCache::new().await;
    let catalog = FakeCatalog::new().with_result(
        "Beatles White Album",
        albums_result(vec![album("wa", "The White Album", "The Beatles")]),
    );

    let mut driver = ReconciliationDriver::new(catalog, test_cache.cache.clone(), ScriptedConfirm::default());
    let local = AlbumMetadata::new("The Beatles", "The White Album", vec![]);
    let outcome = driver.reconcile_album(&local).await.unwrap();

    // The stripped names no longer match "The White Album", so the user is asked
    assert_eq!(outcome, AlbumOutcome::Declined);
    assert_eq!(
        driver.catalog().calls()[0],
        CatalogCall::Search("Beatles White Album".to_string())
    );
}

#[tokio::test]
async fn test_no_results_is_not_found() {
    let test_cache = TestCache::new().await;

    let mut driver = ReconciliationDriver::new(FakeCatalog::new(), test_cache.cache.clone(), ScriptedConfirm::default());
    let outcome = driver.reconcile_album(&queen("Unreleased Demos")).await.unwrap();

    assert_eq!(outcome, AlbumOutcome::NotFound);
    assert!(driver.catalog().added().is_empty());
}

#[tokio::test]
async fn test_already_owned_stops() {
    let test_cache = TestCache::new().await;
    let catalog = FakeCatalog::new()
        .with_result("Queen Greatest Hits", albums_result(vec![album("gh", "Greatest Hits", "Queen")]))
        .owning("gh");

    let mut driver = ReconciliationDriver::new(catalog, test_cache.cache.clone(), ScriptedConfirm::default());
    let outcome = driver.reconcile_album(&queen("Greatest Hits")).await.unwrap();

    assert_eq!(outcome, AlbumOutcome::AlreadyOwned);
    assert!(driver.catalog().added().is_empty());
}

#[tokio::test]
async fn test_prefix_match_prompts_and_adds_on_yes() {
    let test_cache = TestCache::new().await;
    let catalog = FakeCatalog::new().with_result(
        "Queen Greatest Hits",
        albums_result(vec![album("ghr", "Greatest Hits (Remastered)", "Queen")]),
    );

    let mut driver = ReconciliationDriver::new(catalog, test_cache.cache.clone(), ScriptedConfirm::answering(&[true]));
    let outcome = driver.reconcile_album(&queen("Greatest Hits")).await.unwrap();

    assert_eq!(outcome, AlbumOutcome::Added);
    let (catalog, _, confirm) = driver.into_parts();
    assert_eq!(confirm.asked, 1);
    assert!(catalog.calls().contains(&CatalogCall::FetchAlbum("ghr".to_string())));
    assert_eq!(catalog.added(), vec!["ghr"]);
}

#[tokio::test]
async fn test_prefix_match_declined() {
    let test_cache = TestCache::new().await;
    let catalog = FakeCatalog::new().with_result(
        "Queen Greatest Hits",
        albums_result(vec![album("ghr", "Greatest Hits (Remastered)", "Queen")]),
    );

    let mut driver = ReconciliationDriver::new(catalog, test_cache.cache.clone(), ScriptedConfirm::answering(&[false]));
    let outcome = driver.reconcile_album(&queen("Greatest Hits")).await.unwrap();

    assert_eq!(outcome, AlbumOutcome::Declined);
    assert!(driver.catalog().added().is_empty());
}

#[tokio::test]
async fn test_unknown_offers_every_candidate_until_yes() {
    let test_cache = TestCache::new().await;
    let catalog = FakeCatalog::new().with_result(
        "Queen Live Magic",
        albums_result(vec![
            album("a", "Live Killers", "Queen"),
            album("b", "Live at Wembley", "Queen"),
            album("c", "Magic Works", "Queen"),
        ]),
    );

    let mut driver = ReconciliationDriver::new(
        catalog,
        test_cache.cache.clone(),
        ScriptedConfirm::answering(&[false, true]),
    );
    let outcome = driver.reconcile_album(&queen("Live Magic")).await.unwrap();

    assert_eq!(outcome, AlbumOutcome::Added);
    let (catalog, _, confirm) = driver.into_parts();
    assert_eq!(confirm.asked, 2);
    assert_eq!(catalog.added(), vec!["b"]);
    // "c" is never offered once "b" is accepted
    assert!(!catalog.calls().contains(&CatalogCall::UserHasAlbums(vec!["c".to_string()])));
}

#[tokio::test]
async fn test_failed_library_check_skips_candidate() {
    let test_cache = TestCache::new().await;
    let catalog = FakeCatalog::new()
        .with_result(
            "Queen Live Magic",
            albums_result(vec![album("a", "Live Killers", "Queen"), album("b", "Live at Wembley", "Queen")]),
        )
        .failing_check_for("a");

    let mut driver = ReconciliationDriver::new(catalog, test_cache.cache.clone(), ScriptedConfirm::answering(&[true]));
    let outcome = driver.reconcile_album(&queen("Live Magic")).await.unwrap();

    assert_eq!(outcome, AlbumOutcome::Added);
    let (catalog, _, confirm) = driver.into_parts();
    assert_eq!(confirm.asked, 1);
    assert_eq!(catalog.added(), vec!["b"]);
}

#[tokio::test]
async fn test_failed_add_is_an_error() {
    let test_cache = TestCache::new().await;
    let catalog = FakeCatalog::new()
        .with_result("Queen Greatest Hits", albums_result(vec![album("gh", "Greatest Hits", "Queen")]))
        .failing_adds();

    let mut driver = ReconciliationDriver::new(catalog, test_cache.cache.clone(), ScriptedConfirm::default());
    let result = driver.reconcile_album(&queen("Greatest Hits")).await;

    assert!(matches!(result, Err(CliError::Core(_))));
}

// ============================================================================
// Full runs
// ============================================================================

struct StaticLister;

impl DirectoryLister for StaticLister {
    fn list(&self, path: &std::path::Path) -> tunesync_core::Result<Vec<DirectoryEntry>> {
        let entries = match path.to_str() {
            Some("/music") => vec![DirectoryEntry::dir("Queen")],
            Some("/music/Queen") => vec![
                DirectoryEntry::dir("Greatest Hits"),
                DirectoryEntry::dir("Innuendo"),
                DirectoryEntry::dir("Unreleased Demos"),
            ],
            Some(_) => vec![DirectoryEntry::file("01 Track One.mp3")],
            None => vec![],
        };
        Ok(entries)
    }
}

#[tokio::test]
async fn test_run_summarizes_outcomes() {
    let test_cache = TestCache::new().await;
    let catalog = FakeCatalog::new()
        .with_result("Queen Greatest Hits", albums_result(vec![album("gh", "Greatest Hits", "Queen")]))
        .with_result("Queen Innuendo", albums_result(vec![album("in", "Innuendo", "Queen")]))
        .owning("in");

    let mut driver = ReconciliationDriver::new(catalog, test_cache.cache.clone(), ScriptedConfirm::default());
    let albums = AlbumProducer::new("/music", StaticLister).buffer_capacity(1).start();
    let summary = driver.run(albums).await.unwrap();

    assert_eq!(summary.albums_seen, 3);
    assert_eq!(summary.added, 1);
    assert_eq!(summary.already_owned, 1);
    assert_eq!(summary.not_found, 1);
    assert_eq!(summary.declined, 0);

    // Every query was cached, including the one with no results
    assert_eq!(test_cache.cache.len().await.unwrap(), 3);
}

#[tokio::test]
async fn test_second_run_uses_cache() {
    let test_cache = TestCache::new().await;
    let result = albums_result(vec![album("gh", "Greatest Hits", "Queen")]);

    let first = FakeCatalog::new().with_result("Queen Greatest Hits", result.clone());
    let mut driver = ReconciliationDriver::new(first, test_cache.cache.clone(), ScriptedConfirm::default());
    driver.reconcile_album(&queen("Greatest Hits")).await.unwrap();
    assert_eq!(driver.catalog().searches(), 1);

    let second = FakeCatalog::new();
    let mut driver = ReconciliationDriver::new(second, test_cache.cache.clone(), ScriptedConfirm::default());
    let outcome = driver.reconcile_album(&queen("Greatest Hits")).await.unwrap();

    assert_eq!(outcome, AlbumOutcome::Added);
    assert_eq!(driver.catalog().searches(), 0);
}

// ============================================================================
// Free-text search
// ============================================================================

#[tokio::test]
async fn test_search_terms_adds_confirmed_albums_in_one_call() {
    let test_cache = TestCache::new().await;
    let catalog = FakeCatalog::new().with_result(
        "queen live",
        albums_result(vec![
            album("a", "Live Killers", "Queen"),
            album("b", "Live at Wembley", "Queen"),
            album("c", "Live Aid", "Queen"),
        ]),
    );

    let mut driver = ReconciliationDriver::new(
        catalog,
        test_cache.cache.clone(),
        ScriptedConfirm::answering(&[true, false, true]),
    );
    let added = driver.search_terms("queen live").await.unwrap();

    let added: Vec<&str> = added.iter().map(|id| id.as_str()).collect();
    assert_eq!(added, vec!["a", "c"]);

    let calls = driver.catalog().calls();
    assert_eq!(
        calls.last(),
        Some(&CatalogCall::AddAlbums(vec!["a".to_string(), "c".to_string()]))
    );
}

#[tokio::test]
async fn test_search_terms_without_results() {
    let test_cache = TestCache::new().await;

    let mut driver = ReconciliationDriver::new(FakeCatalog::new(), test_cache.cache.clone(), ScriptedConfirm::default());
    let added = driver.search_terms("nothing at all").await.unwrap();

    assert!(added.is_empty());
    assert!(driver.catalog().added().is_empty());
}
