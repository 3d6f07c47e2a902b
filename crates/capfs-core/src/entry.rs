//! Host entry references.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Kind of entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn is_file(self) -> bool {
        self == EntryKind::File
    }

    pub fn is_dir(self) -> bool {
        self == EntryKind::Directory
    }
}

/// A reference to a file or directory held by an [`EntryProvider`].
///
/// `path` is the provider's locator for the entry, relative to the
/// provider root. It is opaque to the traversal engine, which only ever
/// hands it back to the provider that produced it.
///
/// [`EntryProvider`]: crate::provider::EntryProvider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Final path segment. Empty for the provider root.
    pub name: String,
    /// Kind of entry.
    pub kind: EntryKind,
    /// Provider-relative locator.
    pub path: PathBuf,
}

impl Entry {
    /// Create a file entry at `path`; the name is taken from the last segment.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path.into(), EntryKind::File)
    }

    /// Create a directory entry at `path`.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path.into(), EntryKind::Directory)
    }

    /// The root directory of a provider.
    pub fn root() -> Self {
        Self::directory("")
    }

    fn new(path: PathBuf, kind: EntryKind) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, kind, path }
    }

    /// Child entry of this directory.
    pub fn child(&self, name: &str, kind: EntryKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            path: self.path.join(name),
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
