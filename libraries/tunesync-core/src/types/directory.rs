//! Directory listing types

use serde::{Deserialize, Serialize};
use std::ffi::OsString;

/// A single entry returned by a `DirectoryLister`
///
/// `file_name` is the name exactly as stored on disk and is what child paths
/// are built from. `name` is its display form, lossily converted to UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Display name
    pub name: String,
    /// Raw on-disk name
    pub file_name: OsString,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

impl DirectoryEntry {
    /// An entry from a raw on-disk name
    pub fn from_os(file_name: OsString, is_dir: bool) -> Self {
        Self {
            name: file_name.to_string_lossy().into_owned(),
            file_name,
            is_dir,
        }
    }

    /// A directory entry
    pub fn dir(name: impl Into<String>) -> Self {
        Self::from_os(OsString::from(name.into()), true)
    }

    /// A non-directory entry
    pub fn file(name: impl Into<String>) -> Self {
        Self::from_os(OsString::from(name.into()), false)
    }
}
