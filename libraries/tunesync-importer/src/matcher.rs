//! Best match selection between a local album and catalog candidates
//!
//! Candidates are compared on canonical keys in three passes, strongest
//! first. Each pass scans every candidate before the next one starts, and
//! within a pass the first candidate in input order wins.

use crate::canonical::canonicalize_name;
use crate::types::{BestMatch, MatchTier};
use tunesync_core::SimpleAlbum;

/// Pick the catalog album that best corresponds to `artist` / `album`
///
/// The names may be raw or already canonical; canonicalization is
/// idempotent.
pub fn best_match<'a>(artist: &str, album: &str, candidates: &'a [SimpleAlbum]) -> BestMatch<'a> {
    let target_artist = canonicalize_name(artist);
    let target_album = canonicalize_name(album);

    let keyed: Vec<(&SimpleAlbum, String, Vec<String>)> = candidates
        .iter()
        .map(|candidate| {
            let artists = candidate
                .artists
                .iter()
                .map(|a| canonicalize_name(&a.name))
                .collect();
            (candidate, canonicalize_name(&candidate.name), artists)
        })
        .collect();

    let passes: [(MatchTier, KeyTest, KeyTest); 3] = [
        (MatchTier::Exact, equal, equal),
        (MatchTier::SourcePrefix, extends, extends),
        (MatchTier::DestPrefix, extended_by, extends),
    ];

    for (tier, album_matches, artist_matches) in passes {
        for (candidate, candidate_album, candidate_artists) in &keyed {
            tracing::debug!(
                tier = ?tier,
                candidate = %candidate_album,
                target = %target_album,
                "Comparing candidate"
            );

            if album_matches(candidate_album, &target_album)
                && candidate_artists
                    .iter()
                    .any(|a| artist_matches(a, &target_artist))
            {
                tracing::info!(
                    tier = ?tier,
                    id = %candidate.id,
                    "Matched {} - {} to {}",
                    artist,
                    album,
                    candidate.name
                );
                return BestMatch::found(*candidate, tier);
            }
        }
    }

    tracing::debug!("No match for {} - {}", artist, album);
    BestMatch::unknown()
}

/// Compares a candidate key against a target key
type KeyTest = fn(&str, &str) -> bool;

fn equal(candidate: &str, target: &str) -> bool {
    candidate == target
}

fn extends(candidate: &str, target: &str) -> bool {
    candidate.starts_with(target)
}

fn extended_by(candidate: &str, target: &str) -> bool {
    target.starts_with(candidate)
}
