//! capfs-core: capability-scoped file and directory handles.
//!
//! This crate provides:
//!
//! - **Nodes**: permission-verified [`FileNode`] / [`DirectoryNode`] wrappers
//! - **Traversal**: path resolution, directory walking, depth-bounded trees,
//!   glob search with `**`, and box-drawn rendering
//! - **Providers**: the [`EntryProvider`] host interface, with in-memory and
//!   local-disk implementations
//! - **Permissions**: the [`PermissionBroker`] interface and the access gate
//! - **Store**: persistence of entries for later re-verification
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use capfs_core::{DirectoryNode, Host, ListOptions, LocalProvider, PermissionMode};
//!
//! # async fn demo() -> Option<()> {
//! let host = Host::unrestricted(Arc::new(LocalProvider::new(".")));
//! let root = DirectoryNode::open_root(host, PermissionMode::Read).await?;
//!
//! println!("{}", root.render(ListOptions::depth(2)).await);
//! for found in root.glob("**/*.rs").await {
//!     println!("{}", found.path);
//! }
//! # Some(())
//! # }
//! ```

pub mod entry;
pub mod error;
pub mod host;
pub mod matcher;
pub mod node;
pub mod permission;
pub mod provider;
pub mod store;
pub mod traverse;

pub use entry::{Entry, EntryKind};
pub use error::{HandleError, HandleResult};
pub use host::Host;
pub use matcher::{GlobMatcher, PatternMatcher};
pub use node::{DirectoryNode, FileNode, Node};
pub use permission::{
    DenyAll, GrantAll, PermissionBroker, PermissionMode, PermissionState, ReadOnlyBroker,
};
pub use provider::{EntryProvider, LocalProvider, MemoryProvider};
pub use store::{HandleStore, JsonFileStore, MemoryStore};
pub use traverse::{FilterKind, GlobMatch, ListOptions, TreeNode};
