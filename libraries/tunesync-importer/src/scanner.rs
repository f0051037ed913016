//! Album producer for `Artist/Album/Track` libraries
//!
//! The library root holds one directory per artist, each artist directory
//! holds one directory per album, and each album directory holds the track
//! files. The walk runs on the blocking thread pool and hands finished
//! album records to the consumer over a bounded channel, so the walk never
//! gets more than `buffer_capacity` albums ahead of the consumer.
//!
//! Failures never abort the walk. A directory that cannot be listed is
//! logged and skipped, and its siblings are still visited.

use crate::types::{ScanStats, DEFAULT_BUFFER_CAPACITY};
use crate::{ImportError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tunesync_core::{AlbumMetadata, DirectoryLister};

/// Optional one or two digit track number, then the name, then `.mp3`
static TRACK_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d{1,2}\.? )?(?P<name>.*)\.(?:mp3|MP3)$").expect("valid track file pattern")
});

/// Derive a track name from its file name
///
/// `"01 Bohemian Rhapsody.mp3"` becomes `"Bohemian Rhapsody"`. File names
/// that do not end in `.mp3` or `.MP3` are returned unchanged.
pub fn extract_track_name(file_name: &str) -> String {
    TRACK_FILE
        .captures(file_name)
        .and_then(|caps| caps.name("name"))
        .map_or_else(|| file_name.to_string(), |m| m.as_str().to_string())
}

/// Builder for a library walk
pub struct AlbumProducer<L> {
    root: PathBuf,
    lister: L,
    buffer_capacity: usize,
}

impl<L> AlbumProducer<L>
where
    L: DirectoryLister + 'static,
{
    /// Create a producer for the library rooted at `root`
    pub fn new(root: impl Into<PathBuf>, lister: L) -> Self {
        Self {
            root: root.into(),
            lister,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }

    /// Set how many album records may wait for the consumer (minimum 1)
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }

    /// Start walking the library
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(self) -> AlbumStream {
        let (tx, rx) = mpsc::channel(self.buffer_capacity);

        tracing::info!(
            root = %self.root.display(),
            buffer = self.buffer_capacity,
            "Starting library walk"
        );

        let handle = tokio::task::spawn_blocking(move || walk(&self.root, &self.lister, &tx));

        AlbumStream { rx, handle }
    }
}

/// Consumer side of a running library walk
///
/// Records arrive in walk order. Dropping the stream at any point stops
/// the walk before its next directory listing or hand-off.
pub struct AlbumStream {
    rx: mpsc::Receiver<AlbumMetadata>,
    handle: JoinHandle<ScanStats>,
}

impl AlbumStream {
    /// Receive the next album, or `None` once the walk is complete
    pub async fn next(&mut self) -> Option<AlbumMetadata> {
        self.rx.recv().await
    }

    /// Stop receiving and wait for the walk to wind down
    ///
    /// Safe to call before the stream is exhausted; the walk stops before
    /// its next listing or hand-off and records not yet received are
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::ProducerFailed`] if the walk panicked or was
    /// cancelled
    pub async fn finish(mut self) -> Result<ScanStats> {
        self.rx.close();
        let stats = self
            .handle
            .await
            .map_err(|e| ImportError::ProducerFailed(e.to_string()))?;

        tracing::info!(
            artists = stats.artists,
            albums = stats.albums,
            tracks = stats.tracks,
            skipped = stats.skipped_entries,
            failures = stats.listing_failures,
            stopped_early = stats.stopped_early,
            "Library walk finished"
        );

        Ok(stats)
    }
}

fn walk<L: DirectoryLister + ?Sized>(
    root: &Path,
    lister: &L,
    tx: &mpsc::Sender<AlbumMetadata>,
) -> ScanStats {
    let mut stats = ScanStats::default();

    let artists = match lister.list(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to list library root {}: {}", root.display(), e);
            stats.listing_failures += 1;
            return stats;
        }
    };

    for artist in artists {
        if !artist.is_dir {
            tracing::warn!("Skipping non-directory {} in library root", artist.name);
            stats.skipped_entries += 1;
            continue;
        }
        if tx.is_closed() {
            return stopped(stats);
        }
        stats.artists += 1;

        let artist_path = root.join(&artist.file_name);
        let albums = match lister.list(&artist_path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to list artist {}: {}", artist_path.display(), e);
                stats.listing_failures += 1;
                continue;
            }
        };

        for album in albums {
            if !album.is_dir {
                tracing::warn!("Skipping non-directory {} under {}", album.name, artist.name);
                stats.skipped_entries += 1;
                continue;
            }

            if tx.is_closed() {
                return stopped(stats);
            }

            let album_path = artist_path.join(&album.file_name);
            let tracks = match lister.list(&album_path) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Failed to list album {}: {}", album_path.display(), e);
                    stats.listing_failures += 1;
                    continue;
                }
            };

            // Every entry at this level counts as a track, directories included
            let tracks: Vec<String> = tracks
                .iter()
                .map(|entry| extract_track_name(&entry.name))
                .collect();
            let track_count = tracks.len();

            tracing::debug!(
                artist = %artist.name,
                album = %album.name,
                tracks = track_count,
                "Album found"
            );

            if tx
                .blocking_send(AlbumMetadata::new(&artist.name, &album.name, tracks))
                .is_err()
            {
                return stopped(stats);
            }

            stats.albums += 1;
            stats.tracks += track_count;
        }
    }

    stats
}

fn stopped(mut stats: ScanStats) -> ScanStats {
    tracing::debug!("Album consumer went away, stopping walk");
    stats.stopped_early = true;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_track_name() {
        let cases = [
            ("01 Bohemian Rhapsody.mp3", "Bohemian Rhapsody"),
            ("1. Another One Bites the Dust.MP3", "Another One Bites the Dust"),
            ("Killer Queen.mp3", "Killer Queen"),
            ("123 Numbers First.mp3", "123 Numbers First"),
            ("07 Live.flac", "07 Live.flac"),
            ("cover.jpg", "cover.jpg"),
            ("07 Mixed.Mp3", "07 Mixed.Mp3"),
        ];

        for (file_name, want) in cases {
            assert_eq!(extract_track_name(file_name), want, "extract_track_name({:?})", file_name);
        }
    }

    #[test]
    fn test_extension_only() {
        assert_eq!(extract_track_name(".mp3"), "");
        assert_eq!(extract_track_name("01 .mp3"), "");
    }

    #[test]
    fn test_buffer_capacity_has_floor() {
        let producer = AlbumProducer::new("/music", crate::FsDirectoryLister::new()).buffer_capacity(0);
        assert_eq!(producer.buffer_capacity, 1);
    }
}
