//! In-memory entry provider.
//!
//! Used for tests and ephemeral hierarchies. All data is lost when dropped.

use super::traits::{kind_error, read_only_error, EntryProvider};
use crate::entry::{Entry, EntryKind};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::sync::RwLock;

/// Node in the memory provider.
#[derive(Debug, Clone)]
enum Slot {
    File(Vec<u8>),
    Directory,
}

impl Slot {
    fn kind(&self) -> EntryKind {
        match self {
            Slot::File(_) => EntryKind::File,
            Slot::Directory => EntryKind::Directory,
        }
    }
}

/// In-memory provider.
///
/// Thread-safe via internal `RwLock`. Children are reported sorted by name.
#[derive(Debug)]
pub struct MemoryProvider {
    slots: RwLock<HashMap<PathBuf, Slot>>,
    read_only: bool,
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProvider {
    /// Create a new empty provider.
    pub fn new() -> Self {
        let mut slots = HashMap::new();
        // Root directory always exists
        slots.insert(PathBuf::new(), Slot::Directory);
        Self {
            slots: RwLock::new(slots),
            read_only: false,
        }
    }

    /// Reject every mutation made through the [`EntryProvider`] interface.
    ///
    /// Seeding through [`MemoryProvider::write_path`] and
    /// [`MemoryProvider::mkdir_path`] still works.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Normalize a path: remove leading `/`, resolve `.` and `..`.
    fn normalize(path: &Path) -> PathBuf {
        let mut result = PathBuf::new();
        for component in path.components() {
            match component {
                Component::ParentDir => {
                    result.pop();
                }
                Component::Normal(s) => result.push(s),
                Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            }
        }
        result
    }

    fn ensure_parents(slots: &mut HashMap<PathBuf, Slot>, path: &Path) -> io::Result<()> {
        let mut current = PathBuf::new();
        for component in path.parent().into_iter().flat_map(|p| p.components()) {
            if let Component::Normal(s) = component {
                current.push(s);
                let slot = slots.entry(current.clone()).or_insert(Slot::Directory);
                if let Slot::File(_) = slot {
                    return Err(io::Error::new(
                        io::ErrorKind::NotADirectory,
                        format!("not a directory: {}", current.display()),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Write a file at a provider-relative path, creating parents.
    pub async fn write_path(&self, path: impl AsRef<Path>, data: &[u8]) -> io::Result<()> {
        let normalized = Self::normalize(path.as_ref());
        let mut slots = self.slots.write().await;
        Self::ensure_parents(&mut slots, &normalized)?;

        if let Some(Slot::Directory) = slots.get(&normalized) {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("is a directory: {}", normalized.display()),
            ));
        }
        slots.insert(
            normalized,
            Slot::File(data.to_vec()),
        );
        Ok(())
    }

    /// Create a directory (and its parents) at a provider-relative path.
    pub async fn mkdir_path(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let normalized = Self::normalize(path.as_ref());
        let mut slots = self.slots.write().await;
        Self::ensure_parents(&mut slots, &normalized)?;

        match slots.get(&normalized) {
            Some(Slot::Directory) => Ok(()),
            Some(Slot::File(_)) => Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("file exists: {}", normalized.display()),
            )),
            None => {
                slots.insert(normalized, Slot::Directory);
                Ok(())
            }
        }
    }

    /// Look up an existing entry by provider-relative path.
    pub async fn entry(&self, path: impl AsRef<Path>) -> Option<Entry> {
        let normalized = Self::normalize(path.as_ref());
        let slots = self.slots.read().await;
        slots.get(&normalized).map(|slot| match slot.kind() {
            EntryKind::File => Entry::file(normalized.clone()),
            EntryKind::Directory => Entry::directory(normalized.clone()),
        })
    }

    async fn lookup(&self, dir: &Entry, name: &str, kind: EntryKind, create: bool) -> io::Result<Entry> {
        validate_name(name)?;
        let dir_path = Self::normalize(&dir.path);
        let path = dir_path.join(name);

        {
            let slots = self.slots.read().await;
            match slots.get(&dir_path) {
                Some(Slot::Directory) => {}
                Some(Slot::File(_)) => return Err(kind_error(dir, EntryKind::Directory)),
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("not found: {}", dir_path.display()),
                    ))
                }
            }
            if let Some(slot) = slots.get(&path) {
                let entry = dir.child(name, slot.kind());
                return if slot.kind() == kind {
                    Ok(entry)
                } else {
                    Err(kind_error(&entry, kind))
                };
            }
        }

        if !create {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not found: {}", path.display()),
            ));
        }
        if self.read_only {
            return Err(read_only_error());
        }

        let mut slots = self.slots.write().await;
        let slot = match kind {
            EntryKind::File => Slot::File(Vec::new()),
            EntryKind::Directory => Slot::Directory,
        };
        // Another writer may have raced us between the two locks.
        let existing = slots.entry(path).or_insert(slot).kind();
        let entry = dir.child(name, existing);
        if existing == kind {
            Ok(entry)
        } else {
            Err(kind_error(&entry, kind))
        }
    }
}

/// Names must be a single, non-special path segment.
fn validate_name(name: &str) -> io::Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid entry name: {name:?}"),
        ));
    }
    Ok(())
}

#[async_trait]
impl EntryProvider for MemoryProvider {
    async fn children(&self, dir: &Entry) -> io::Result<Vec<Entry>> {
        let normalized = Self::normalize(&dir.path);
        let slots = self.slots.read().await;

        match slots.get(&normalized) {
            Some(Slot::Directory) => {}
            Some(Slot::File(_)) => return Err(kind_error(dir, EntryKind::Directory)),
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("not found: {}", dir.path.display()),
                ))
            }
        }

        let mut result: Vec<Entry> = slots
            .iter()
            .filter(|(path, _)| path.parent() == Some(normalized.as_path()) && **path != normalized)
            .filter_map(|(path, slot)| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                Some(dir.child(&name, slot.kind()))
            })
            .collect();

        // Sort for consistent ordering
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn child_file(&self, dir: &Entry, name: &str, create: bool) -> io::Result<Entry> {
        self.lookup(dir, name, EntryKind::File, create).await
    }

    async fn child_directory(&self, dir: &Entry, name: &str, create: bool) -> io::Result<Entry> {
        self.lookup(dir, name, EntryKind::Directory, create).await
    }

    async fn remove_child(&self, dir: &Entry, name: &str, recursive: bool) -> io::Result<()> {
        validate_name(name)?;
        if self.read_only {
            return Err(read_only_error());
        }
        let target = Self::normalize(&dir.path).join(name);
        let mut slots = self.slots.write().await;

        match slots.get(&target) {
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("not found: {}", target.display()),
                ))
            }
            Some(Slot::Directory) => {
                let descendants: Vec<PathBuf> = slots
                    .keys()
                    .filter(|k| k.starts_with(&target) && **k != target)
                    .cloned()
                    .collect();
                if !descendants.is_empty() && !recursive {
                    return Err(io::Error::new(
                        io::ErrorKind::DirectoryNotEmpty,
                        format!("directory not empty: {}", target.display()),
                    ));
                }
                for path in descendants {
                    slots.remove(&path);
                }
            }
            Some(Slot::File(_)) => {}
        }
        slots.remove(&target);
        Ok(())
    }

    async fn read(&self, file: &Entry) -> io::Result<Vec<u8>> {
        let normalized = Self::normalize(&file.path);
        let slots = self.slots.read().await;
        match slots.get(&normalized) {
            Some(Slot::File(data)) => Ok(data.clone()),
            Some(Slot::Directory) => Err(kind_error(file, EntryKind::File)),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not found: {}", file.path.display()),
            )),
        }
    }

    async fn write(&self, file: &Entry, data: &[u8]) -> io::Result<()> {
        if self.read_only {
            return Err(read_only_error());
        }
        self.write_path(&file.path, data).await
    }

    async fn size(&self, file: &Entry) -> io::Result<u64> {
        let normalized = Self::normalize(&file.path);
        let slots = self.slots.read().await;
        match slots.get(&normalized) {
            Some(Slot::File(data)) => Ok(data.len() as u64),
            Some(Slot::Directory) => Err(kind_error(file, EntryKind::File)),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not found: {}", file.path.display()),
            )),
        }
    }

    fn read_only(&self) -> bool {
        self.read_only
    }
}
