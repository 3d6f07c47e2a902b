//! Local filesystem provider.
//!
//! Exposes a real directory tree, with optional read-only mode.

use super::traits::{kind_error, read_only_error, EntryProvider};
use crate::entry::{Entry, EntryKind};
use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Local filesystem provider.
///
/// Entry paths are relative to `root`. For example, if `root` is
/// `/home/amy/project`, the entry `src/main.rs` is
/// `/home/amy/project/src/main.rs`.
#[derive(Debug, Clone)]
pub struct LocalProvider {
    root: PathBuf,
    read_only: bool,
}

impl LocalProvider {
    /// Create a provider rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            read_only: false,
        }
    }

    /// Create a read-only provider.
    pub fn read_only(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            read_only: true,
        }
    }

    /// Get the root path.
    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// Resolve an entry locator to an absolute path within the root.
    ///
    /// Returns an error if the path escapes the root (via `..` or a symlink).
    fn resolve(&self, path: &Path) -> io::Result<PathBuf> {
        let mut relative = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(c) => relative.push(c),
                Component::CurDir | Component::RootDir => {}
                Component::ParentDir | Component::Prefix(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::PermissionDenied,
                        format!("path escapes root: {}", path.display()),
                    ));
                }
            }
        }

        let full = self.root.join(&relative);

        // Canonicalize to catch symlinks pointing outside the root.
        // For non-existent paths, canonicalize the parent and append the name.
        let canonical = if full.exists() {
            full.canonicalize()?
        } else {
            match (full.parent(), full.file_name()) {
                (Some(parent), Some(name)) if parent.exists() => parent.canonicalize()?.join(name),
                // Parent doesn't exist, use the path as-is (the operation will fail)
                _ => full,
            }
        };

        let canonical_root = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());
        if !canonical.starts_with(&canonical_root) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!(
                    "path escapes root: {} is not under {}",
                    canonical.display(),
                    canonical_root.display()
                ),
            ));
        }
        Ok(canonical)
    }

    /// Resolve `name` inside `dir` without following a symlink at `name`.
    ///
    /// Containment is checked on the canonical parent; the final component
    /// is appended as-is so callers see the link itself.
    fn resolve_no_follow(&self, dir: &Path, name: &str) -> io::Result<PathBuf> {
        validate_name(name)?;
        Ok(self.resolve(dir)?.join(name))
    }

    fn check_writable(&self) -> io::Result<()> {
        if self.read_only {
            Err(read_only_error())
        } else {
            Ok(())
        }
    }

    /// Kind of an existing path. Symlinks are followed.
    async fn kind_of(full: &Path) -> io::Result<EntryKind> {
        let meta = fs::metadata(full).await?;
        // Special files (sockets, pipes, devices) are treated as files.
        Ok(if meta.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        })
    }

    async fn lookup(&self, dir: &Entry, name: &str, kind: EntryKind, create: bool) -> io::Result<Entry> {
        validate_name(name)?;
        let dir_full = self.resolve(&dir.path)?;
        if Self::kind_of(&dir_full).await? != EntryKind::Directory {
            return Err(kind_error(dir, EntryKind::Directory));
        }

        let entry = dir.child(name, kind);
        let full = self.resolve(&entry.path)?;
        match Self::kind_of(&full).await {
            Ok(found) if found == kind => return Ok(entry),
            Ok(found) => return Err(kind_error(&dir.child(name, found), kind)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        if !create {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not found: {}", entry.path.display()),
            ));
        }
        self.check_writable()?;
        match kind {
            EntryKind::File => {
                fs::OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .open(&full)
                    .await?;
            }
            EntryKind::Directory => fs::create_dir(&full).await?,
        }
        Ok(entry)
    }
}

fn validate_name(name: &str) -> io::Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid entry name: {name:?}"),
        ));
    }
    Ok(())
}

/// Kind a directory listing reports for `path`, or `None` to leave it out.
///
/// Directory symlinks and dangling links are left out so the hierarchy
/// stays acyclic. So is an entry whose type cannot be read.
async fn listed_kind(path: &Path, file_type: io::Result<std::fs::FileType>) -> Option<EntryKind> {
    let file_type = match file_type {
        Ok(ft) => ft,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping entry of unknown type");
            return None;
        }
    };
    if file_type.is_symlink() {
        match fs::metadata(path).await {
            Ok(meta) if meta.is_dir() => None,
            Ok(_) => Some(EntryKind::File),
            Err(_) => None,
        }
    } else if file_type.is_dir() {
        Some(EntryKind::Directory)
    } else {
        Some(EntryKind::File)
    }
}

#[async_trait]
impl EntryProvider for LocalProvider {
    async fn children(&self, dir: &Entry) -> io::Result<Vec<Entry>> {
        let full = self.resolve(&dir.path)?;
        let mut entries = Vec::new();
        let mut rd = fs::read_dir(&full).await?;

        while let Some(item) = rd.next_entry().await? {
            let name = item.file_name().to_string_lossy().into_owned();
            let Some(kind) = listed_kind(&item.path(), item.file_type().await).await else {
                continue;
            };
            entries.push(dir.child(&name, kind));
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn child_file(&self, dir: &Entry, name: &str, create: bool) -> io::Result<Entry> {
        self.lookup(dir, name, EntryKind::File, create).await
    }

    async fn child_directory(&self, dir: &Entry, name: &str, create: bool) -> io::Result<Entry> {
        self.lookup(dir, name, EntryKind::Directory, create).await
    }

    async fn remove_child(&self, dir: &Entry, name: &str, recursive: bool) -> io::Result<()> {
        self.check_writable()?;
        let full = self.resolve_no_follow(&dir.path, name)?;
        let meta = fs::symlink_metadata(&full).await?;

        // A symlink is removed as a link, whatever it points at.
        if meta.file_type().is_symlink() {
            fs::remove_file(&full).await
        } else if meta.is_dir() {
            if recursive {
                fs::remove_dir_all(&full).await
            } else {
                fs::remove_dir(&full).await
            }
        } else {
            fs::remove_file(&full).await
        }
    }

    /// Same rules as `child_file`/`child_directory`, so a directory
    /// symlink that listings skip is still reachable by name.
    async fn child(&self, dir: &Entry, name: &str) -> io::Result<Entry> {
        validate_name(name)?;
        let dir_full = self.resolve(&dir.path)?;
        if Self::kind_of(&dir_full).await? != EntryKind::Directory {
            return Err(kind_error(dir, EntryKind::Directory));
        }
        let kind = Self::kind_of(&self.resolve(&dir.path.join(name))?).await?;
        Ok(dir.child(name, kind))
    }

    async fn read(&self, file: &Entry) -> io::Result<Vec<u8>> {
        let full = self.resolve(&file.path)?;
        fs::read(&full).await
    }

    async fn write(&self, file: &Entry, data: &[u8]) -> io::Result<()> {
        self.check_writable()?;
        let full = self.resolve(&file.path)?;
        if Self::kind_of(&full).await.ok() == Some(EntryKind::Directory) {
            return Err(kind_error(file, EntryKind::File));
        }
        fs::write(&full, data).await
    }

    async fn size(&self, file: &Entry) -> io::Result<u64> {
        let full = self.resolve(&file.path)?;
        Ok(fs::metadata(&full).await?.len())
    }

    fn read_only(&self) -> bool {
        self.read_only
    }
}
