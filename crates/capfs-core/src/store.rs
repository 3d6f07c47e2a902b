//! Persistent handle storage.
//!
//! Stores remember *entries*, never grants: a stored entry has to pass
//! the access gate again through [`reopen`] before it is usable.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::entry::Entry;
use crate::host::Host;
use crate::node::Node;
use crate::permission::PermissionMode;

/// Key-value store of entries.
#[async_trait]
pub trait HandleStore: Send + Sync {
    async fn put(&self, key: &str, entry: &Entry) -> io::Result<()>;

    async fn get(&self, key: &str) -> io::Result<Option<Entry>>;

    /// Remove a key. Returns whether it was present.
    async fn remove(&self, key: &str) -> io::Result<bool>;

    /// All keys, sorted.
    async fn keys(&self) -> io::Result<Vec<String>>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HandleStore for MemoryStore {
    async fn put(&self, key: &str, entry: &Entry) -> io::Result<()> {
        self.entries.write().await.insert(key.to_string(), entry.clone());
        Ok(())
    }

    async fn get(&self, key: &str) -> io::Result<Option<Entry>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> io::Result<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn keys(&self) -> io::Result<Vec<String>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}

/// Store backed by a single JSON document, rewritten on every mutation.
///
/// A mutation is visible in memory only once it has reached disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Entry>>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading it if the file exists.
    pub async fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(data) => serde_json::from_slice(&data)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, Entry>) -> io::Result<()> {
        let data = serde_json::to_vec_pretty(entries).map_err(io::Error::other)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        // Write to a sibling and rename so readers never see a torn file.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &data).await?;
        tokio::fs::rename(&tmp, &self.path).await
    }
}

#[async_trait]
impl HandleStore for JsonFileStore {
    async fn put(&self, key: &str, entry: &Entry) -> io::Result<()> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), entry.clone());
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn get(&self, key: &str) -> io::Result<Option<Entry>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> io::Result<bool> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(key) {
            return Ok(false);
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next).await?;
        *entries = next;
        Ok(true)
    }

    async fn keys(&self) -> io::Result<Vec<String>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}

/// Look up a stored entry and pass it through the access gate.
pub async fn reopen(
    store: &dyn HandleStore,
    host: Host,
    key: &str,
    mode: PermissionMode,
) -> Option<Node> {
    let entry = match store.get(key).await {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            tracing::debug!(key, "no stored entry");
            return None;
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "handle store read failed");
            return None;
        }
    };
    Node::open(host, entry, mode).await
}
