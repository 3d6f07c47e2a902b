//! Shared fixtures for capfs-core integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use capfs_core::{DirectoryNode, Entry, EntryProvider, Host, MemoryProvider, PermissionMode};

/// Wraps a [`MemoryProvider`], counting enumerations and failing chosen ones.
pub struct RecordingProvider {
    pub inner: MemoryProvider,
    pub failing: Vec<PathBuf>,
    listings: AtomicUsize,
}

impl RecordingProvider {
    pub fn new(inner: MemoryProvider) -> Self {
        Self {
            inner,
            failing: Vec::new(),
            listings: AtomicUsize::new(0),
        }
    }

    pub fn failing_at(mut self, path: &str) -> Self {
        self.failing.push(PathBuf::from(path));
        self
    }

    pub fn listings(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntryProvider for RecordingProvider {
    async fn children(&self, dir: &Entry) -> io::Result<Vec<Entry>> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&dir.path) {
            return Err(io::Error::other(format!("injected fault at {}", dir.path.display())));
        }
        self.inner.children(dir).await
    }

    async fn child_file(&self, dir: &Entry, name: &str, create: bool) -> io::Result<Entry> {
        self.inner.child_file(dir, name, create).await
    }

    async fn child_directory(&self, dir: &Entry, name: &str, create: bool) -> io::Result<Entry> {
        self.inner.child_directory(dir, name, create).await
    }

    async fn remove_child(&self, dir: &Entry, name: &str, recursive: bool) -> io::Result<()> {
        self.inner.remove_child(dir, name, recursive).await
    }

    async fn read(&self, file: &Entry) -> io::Result<Vec<u8>> {
        self.inner.read(file).await
    }

    async fn write(&self, file: &Entry, data: &[u8]) -> io::Result<()> {
        self.inner.write(file, data).await
    }
}

/// Memory provider seeded with files (parents are created implicitly).
pub async fn memory_with(files: &[&str]) -> MemoryProvider {
    let fs = MemoryProvider::new();
    for path in files {
        fs.write_path(path, path.as_bytes()).await.unwrap();
    }
    fs
}

/// Root node over `provider` with every permission granted.
pub async fn open_root(provider: Arc<dyn EntryProvider>) -> DirectoryNode {
    DirectoryNode::open_root(Host::unrestricted(provider), PermissionMode::ReadWrite)
        .await
        .unwrap()
}
