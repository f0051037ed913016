//! Filesystem directory lister

use std::fs;
use std::path::Path;
use tunesync_core::{DirectoryEntry, DirectoryLister};

/// Lists directories on the local filesystem
///
/// Entries are returned sorted by name so walks are reproducible. Symlinks
/// are reported as non-directories.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDirectoryLister;

impl FsDirectoryLister {
    /// Create a new filesystem lister
    pub fn new() -> Self {
        Self
    }
}

impl DirectoryLister for FsDirectoryLister {
    fn list(&self, path: &Path) -> tunesync_core::Result<Vec<DirectoryEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let is_dir = entry.file_type()?.is_dir();
            entries.push(DirectoryEntry::from_os(entry.file_name(), is_dir));
        }

        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(entries)
    }
}
