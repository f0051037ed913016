//! Reconciliation of local albums against the remote catalog
//!
//! For each local album the driver builds a free-text query, answers it
//! from the search cache when it can (falling back to the catalog and
//! refreshing the cache otherwise), picks the best candidate and adds it to
//! the user's library. Only exact matches are added without asking.

use crate::error::Result;
use crate::prompt::Confirm;
use serde::Serialize;
use tunesync_core::{AlbumId, AlbumMetadata, CatalogClient, SearchResult, SearchType, SimpleAlbum};
use tunesync_importer::{best_match, AlbumStream};
use tunesync_storage::SearchCache;

/// Result kinds requested for every search
pub const SEARCH_KINDS: [SearchType; 2] = [SearchType::Artist, SearchType::Album];

/// What happened to one local album
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlbumOutcome {
    /// The catalog returned no albums for the query
    NotFound,
    /// A candidate is already saved in the user's library
    AlreadyOwned,
    /// A candidate was added to the user's library
    Added,
    /// No candidate was added
    Declined,
}

/// Totals for one reconciliation run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub albums_seen: usize,
    pub not_found: usize,
    pub already_owned: usize,
    pub added: usize,
    pub declined: usize,
}

impl ReconcileSummary {
    pub fn record(&mut self, outcome: AlbumOutcome) {
        self.albums_seen += 1;
        match outcome {
            AlbumOutcome::NotFound => self.not_found += 1,
            AlbumOutcome::AlreadyOwned => self.already_owned += 1,
            AlbumOutcome::Added => self.added += 1,
            AlbumOutcome::Declined => self.declined += 1,
        }
    }
}

/// Drops one leading `"The "` from a name
pub fn strip_leading_the(name: &str) -> &str {
    name.strip_prefix("The ").unwrap_or(name)
}

/// Free-text query for a local album
pub fn album_query(album: &AlbumMetadata) -> String {
    format!(
        "{} {}",
        strip_leading_the(&album.artist),
        strip_leading_the(&album.name)
    )
}

pub struct ReconciliationDriver<C, P> {
    catalog: C,
    cache: SearchCache,
    confirm: P,
}

impl<C, P> ReconciliationDriver<C, P>
where
    C: CatalogClient,
    P: Confirm,
{
    pub fn new(catalog: C, cache: SearchCache, confirm: P) -> Self {
        Self {
            catalog,
            cache,
            confirm,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    pub fn into_parts(self) -> (C, SearchCache, P) {
        (self.catalog, self.cache, self.confirm)
    }

    /// Answer `query` from the cache, or from the catalog on a miss
    ///
    /// A catalog answer is written back to the cache; a failed write is
    /// logged and otherwise ignored.
    pub async fn search_with_cache(&self, query: &str) -> Result<SearchResult> {
        match self.cache.search(query).await {
            Ok(result) => {
                tracing::info!(query = %query, "Found results in cache");
                return Ok(result);
            }
            Err(e) if e.is_not_found() => {
                tracing::info!(query = %query, "Cache miss, searching catalog");
            }
            Err(e) => {
                tracing::warn!(query = %query, "Cache search failed: {}", e);
            }
        }

        let result = self.catalog.search(query, &SEARCH_KINDS).await?;

        if let Err(e) = self.cache.upsert(query, &result).await {
            tracing::warn!(query = %query, "Failed to upsert search into cache: {}", e);
        }

        Ok(result)
    }

    /// Reconcile every album the stream yields
    pub async fn run(&mut self, mut albums: AlbumStream) -> Result<ReconcileSummary> {
        let mut summary = ReconcileSummary::default();

        while let Some(album) = albums.next().await {
            let outcome = self.reconcile_album(&album).await?;
            summary.record(outcome);
        }

        let stats = albums.finish().await?;

        tracing::info!(
            albums_seen = summary.albums_seen,
            not_found = summary.not_found,
            already_owned = summary.already_owned,
            added = summary.added,
            declined = summary.declined,
            listing_failures = stats.listing_failures,
            "Reconciliation complete"
        );

        Ok(summary)
    }

    /// Reconcile one local album
    pub async fn reconcile_album(&mut self, album: &AlbumMetadata) -> Result<AlbumOutcome> {
        let artist = strip_leading_the(&album.artist);
        let name = strip_leading_the(&album.name);
        let query = album_query(album);
        println!(">> Searching for {query}");

        let result = self.search_with_cache(&query).await?;
        let candidates = result.album_items();
        if candidates.is_empty() {
            println!("!! Failed to find {query}");
            return Ok(AlbumOutcome::NotFound);
        }

        let best = best_match(artist, name, candidates);
        let considered: Vec<&SimpleAlbum> = match best.album {
            Some(candidate) => vec![candidate],
            None => {
                tracing::warn!("Found no good match for {query}");
                candidates.iter().collect()
            }
        };

        println!("Albums:");
        for candidate in considered {
            print_candidate(candidate);

            match self.catalog.user_has_albums(std::slice::from_ref(&candidate.id)).await {
                Ok(flags) if flags.first() == Some(&true) => {
                    println!(
                        "User already has {} / {}, considered a match",
                        candidate.primary_artist().unwrap_or_default(),
                        candidate.name
                    );
                    return Ok(AlbumOutcome::AlreadyOwned);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(id = %candidate.id, "Library check failed: {}", e);
                    continue;
                }
            }

            if best.tier.is_exact() {
                self.add(candidate, name).await?;
                return Ok(AlbumOutcome::Added);
            }

            tracing::info!(tier = ?best.tier, "Match was not exact, so prompting");
            self.print_tracks(&candidate.id).await;

            if self.confirm.confirm("Add to library?")? {
                self.add(candidate, name).await?;
                return Ok(AlbumOutcome::Added);
            }
        }

        Ok(AlbumOutcome::Declined)
    }

    /// Offer every album found for free-text `terms`; returns the ids added
    pub async fn search_terms(&mut self, terms: &str) -> Result<Vec<AlbumId>> {
        let result = self.search_with_cache(terms).await?;
        let candidates = result.album_items();
        if candidates.is_empty() {
            println!("!! Failed to find {terms}");
            return Ok(Vec::new());
        }

        println!("Albums:");
        let mut to_add: Vec<&SimpleAlbum> = Vec::new();
        for candidate in candidates {
            print_candidate(candidate);
            self.print_tracks(&candidate.id).await;

            if self.confirm.confirm("Add to library?")? {
                to_add.push(candidate);
            }
        }

        if to_add.is_empty() {
            return Ok(Vec::new());
        }

        println!("Adding...");
        for album in &to_add {
            println!("    {} / {}", album.primary_artist().unwrap_or_default(), album.name);
        }

        let ids: Vec<AlbumId> = to_add.iter().map(|a| a.id.clone()).collect();
        self.catalog.add_albums_to_library(&ids).await?;
        tracing::info!(count = ids.len(), "Added albums to library");

        Ok(ids)
    }

    async fn add(&self, candidate: &SimpleAlbum, local_name: &str) -> Result<()> {
        println!("Adding...");
        println!(
            "    {} / {}",
            candidate.primary_artist().unwrap_or_default(),
            local_name
        );

        self.catalog
            .add_albums_to_library(std::slice::from_ref(&candidate.id))
            .await?;

        tracing::info!(id = %candidate.id, album = %candidate.name, "Added album to library");
        Ok(())
    }

    async fn print_tracks(&self, id: &AlbumId) {
        println!("    >> Tracks:");
        match self.catalog.fetch_album(id).await {
            Ok(album) => {
                for track in &album.tracks.items {
                    println!("        {}", track.name);
                }
            }
            Err(e) => tracing::warn!(id = %id, "Failed to fetch album tracks: {}", e),
        }
    }
}

fn print_candidate(candidate: &SimpleAlbum) {
    println!("    {}", candidate.name);
    println!("    >> Artists:");
    for artist in &candidate.artists {
        println!("        {}", artist.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_leading_the() {
        assert_eq!(strip_leading_the("The Beatles"), "Beatles");
        assert_eq!(strip_leading_the("Theatre of Tragedy"), "Theatre of Tragedy");
        assert_eq!(strip_leading_the("The The"), "The");
        assert_eq!(strip_leading_the("the Beatles"), "the Beatles");
    }

    #[test]
    fn test_album_query() {
        let album = AlbumMetadata::new("The Who", "The Who Sell Out", vec![]);
        assert_eq!(album_query(&album), "Who Who Sell Out");
    }

    #[test]
    fn test_summary_record() {
        let mut summary = ReconcileSummary::default();
        summary.record(AlbumOutcome::Added);
        summary.record(AlbumOutcome::NotFound);
        summary.record(AlbumOutcome::Added);

        assert_eq!(summary.albums_seen, 3);
        assert_eq!(summary.added, 2);
        assert_eq!(summary.not_found, 1);
    }
}
