//! Permission-verified file nodes.

use sha2::{Digest, Sha256};

use crate::entry::Entry;
use crate::error::{log_boundary, HandleError, HandleResult};
use crate::host::Host;
use crate::permission::{verify, PermissionMode};

/// A file the caller holds a verified grant for.
#[derive(Debug, Clone)]
pub struct FileNode {
    host: Host,
    entry: Entry,
    mode: PermissionMode,
}

impl FileNode {
    /// Pass `entry` through the access gate.
    ///
    /// Returns `None` if the entry is not a file or permission for `mode`
    /// is neither held nor granted on request.
    pub async fn open(host: Host, entry: Entry, mode: PermissionMode) -> Option<Self> {
        if !entry.is_file() {
            tracing::debug!(path = %entry.path.display(), "not a file");
            return None;
        }
        if !verify(host.broker.as_ref(), &entry, mode).await {
            return None;
        }
        Some(Self { host, entry, mode })
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn mode(&self) -> PermissionMode {
        self.mode
    }

    /// Whether `mode` is covered by this node's grant, asking again if not.
    pub async fn verify_permission(&self, mode: PermissionMode) -> bool {
        self.mode.covers(mode) || verify(self.host.broker.as_ref(), &self.entry, mode).await
    }

    async fn require(&self, mode: PermissionMode) -> HandleResult<()> {
        if self.verify_permission(mode).await {
            Ok(())
        } else {
            Err(HandleError::PermissionDenied(self.entry.path.display().to_string()))
        }
    }

    fn target(&self) -> String {
        self.entry.path.display().to_string()
    }

    /// Entire file contents.
    pub async fn read(&self) -> Option<Vec<u8>> {
        match self.host.provider.read(&self.entry).await {
            Ok(data) => Some(data),
            Err(e) => {
                log_boundary("read", &self.target(), &HandleError::from(e));
                None
            }
        }
    }

    /// File contents as UTF-8. `None` if unreadable or not valid UTF-8.
    pub async fn read_to_string(&self) -> Option<String> {
        let data = self.read().await?;
        match String::from_utf8(data) {
            Ok(text) => Some(text),
            Err(_) => {
                tracing::debug!(path = %self.target(), "file is not valid UTF-8");
                None
            }
        }
    }

    /// Replace the file contents. Requires `ReadWrite`.
    pub async fn write(&self, data: &[u8]) -> bool {
        let result: HandleResult<()> = async {
            self.require(PermissionMode::ReadWrite).await?;
            self.host.provider.write(&self.entry, data).await?;
            Ok(())
        }
        .await;
        match result {
            Ok(()) => true,
            Err(e) => {
                log_boundary("write", &self.target(), &e);
                false
            }
        }
    }

    /// Lowercase hex SHA-256 of the file contents.
    pub async fn hash(&self) -> Option<String> {
        let data = self.read().await?;
        Some(format!("{:x}", Sha256::digest(&data)))
    }

    /// Size in bytes.
    pub async fn size(&self) -> Option<u64> {
        match self.host.provider.size(&self.entry).await {
            Ok(size) => Some(size),
            Err(e) => {
                log_boundary("size", &self.target(), &HandleError::from(e));
                None
            }
        }
    }
}
