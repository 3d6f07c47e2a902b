//! Capability nodes.
//!
//! A node is an [`Entry`] that has passed the access gate for some
//! [`PermissionMode`]. Nodes are only ever produced by the gate, so
//! holding one means the grant was confirmed at construction time.

mod directory;
mod file;

pub use directory::DirectoryNode;
pub use file::FileNode;

use crate::entry::Entry;
use crate::host::Host;
use crate::permission::PermissionMode;

/// A verified file or directory.
#[derive(Debug, Clone)]
pub enum Node {
    File(FileNode),
    Directory(DirectoryNode),
}

impl Node {
    /// Pass `entry` through the gate as whichever node kind it is.
    pub async fn open(host: Host, entry: Entry, mode: PermissionMode) -> Option<Self> {
        if entry.is_dir() {
            DirectoryNode::open(host, entry, mode).await.map(Node::Directory)
        } else {
            FileNode::open(host, entry, mode).await.map(Node::File)
        }
    }

    pub fn name(&self) -> &str {
        self.entry().name.as_str()
    }

    pub fn entry(&self) -> &Entry {
        match self {
            Node::File(f) => f.entry(),
            Node::Directory(d) => d.entry(),
        }
    }

    pub fn mode(&self) -> PermissionMode {
        match self {
            Node::File(f) => f.mode(),
            Node::Directory(d) => d.mode(),
        }
    }

    pub async fn verify_permission(&self, mode: PermissionMode) -> bool {
        match self {
            Node::File(f) => f.verify_permission(mode).await,
            Node::Directory(d) => d.verify_permission(mode).await,
        }
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(f) => Some(f),
            Node::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryNode> {
        match self {
            Node::Directory(d) => Some(d),
            Node::File(_) => None,
        }
    }

    pub fn into_file(self) -> Option<FileNode> {
        match self {
            Node::File(f) => Some(f),
            Node::Directory(_) => None,
        }
    }

    pub fn into_directory(self) -> Option<DirectoryNode> {
        match self {
            Node::Directory(d) => Some(d),
            Node::File(_) => None,
        }
    }
}
