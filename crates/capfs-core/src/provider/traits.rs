//! The host entry provider interface.

use async_trait::async_trait;
use std::io;

use crate::entry::{Entry, EntryKind};

/// Abstract host filesystem.
///
/// Every entry handed to a provider was produced by that same provider
/// (either [`EntryProvider::root`] or one of the lookup methods). Nothing
/// is cached on the caller's side: each `children` call re-queries the host.
#[async_trait]
pub trait EntryProvider: Send + Sync {
    /// The directory every other entry descends from.
    fn root(&self) -> Entry {
        Entry::root()
    }

    /// List the direct children of a directory, in host order.
    async fn children(&self, dir: &Entry) -> io::Result<Vec<Entry>>;

    /// Look up a child file by name, creating an empty one if `create` is set.
    ///
    /// Fails with `IsADirectory` when the name is taken by a directory.
    async fn child_file(&self, dir: &Entry, name: &str, create: bool) -> io::Result<Entry>;

    /// Look up a child directory by name, creating it if `create` is set.
    ///
    /// Fails with `NotADirectory` when the name is taken by a file.
    async fn child_directory(&self, dir: &Entry, name: &str, create: bool) -> io::Result<Entry>;

    /// Remove a child by name. Non-empty directories require `recursive`.
    async fn remove_child(&self, dir: &Entry, name: &str, recursive: bool) -> io::Result<()>;

    /// Read the entire contents of a file.
    async fn read(&self, file: &Entry) -> io::Result<Vec<u8>>;

    /// Replace the contents of a file.
    ///
    /// Returns `Err` if the provider is read-only.
    async fn write(&self, file: &Entry, data: &[u8]) -> io::Result<()>;

    /// Size of a file in bytes.
    async fn size(&self, file: &Entry) -> io::Result<u64> {
        Ok(self.read(file).await?.len() as u64)
    }

    /// Returns true if this provider rejects every mutation.
    fn read_only(&self) -> bool {
        false
    }

    /// Look up a child of either kind.
    async fn child(&self, dir: &Entry, name: &str) -> io::Result<Entry> {
        self.children(dir)
            .await?
            .into_iter()
            .find(|e| e.name == name)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("not found: {}", dir.path.join(name).display()),
                )
            })
    }
}

/// Error for lookups that hit an entry of the wrong kind.
pub(crate) fn kind_error(entry: &Entry, wanted: EntryKind) -> io::Error {
    match wanted {
        EntryKind::File => io::Error::new(
            io::ErrorKind::IsADirectory,
            format!("is a directory: {}", entry.path.display()),
        ),
        EntryKind::Directory => io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("not a directory: {}", entry.path.display()),
        ),
    }
}

pub(crate) fn read_only_error() -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, "provider is read-only")
}
