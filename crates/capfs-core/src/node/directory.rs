//! Permission-verified directory nodes: the entry point of every traversal.

use crate::entry::Entry;
use crate::error::{log_boundary, HandleError, HandleResult};
use crate::host::Host;
use crate::permission::{verify, PermissionMode};
use crate::traverse::{self, GlobMatch, ListOptions, TreeNode};

use super::file::FileNode;
use super::Node;

/// A directory the caller holds a verified grant for.
///
/// Every public operation is total: failures are logged and surface as
/// `None`, `false` or an empty collection.
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    host: Host,
    entry: Entry,
    mode: PermissionMode,
}

impl DirectoryNode {
    /// Pass `entry` through the access gate.
    pub async fn open(host: Host, entry: Entry, mode: PermissionMode) -> Option<Self> {
        if !entry.is_dir() {
            tracing::debug!(path = %entry.path.display(), "not a directory");
            return None;
        }
        if !verify(host.broker.as_ref(), &entry, mode).await {
            return None;
        }
        Some(Self { host, entry, mode })
    }

    /// Open the provider's root directory.
    pub async fn open_root(host: Host, mode: PermissionMode) -> Option<Self> {
        let root = host.provider.root();
        Self::open(host, root, mode).await
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

    pub fn host(&self) -> &Host {
        &self.host
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

    fn target(&self, path: &str) -> String {
        self.entry.path.join(path).display().to_string()
    }

    /// Locate the parent directory of `path` and the terminal name under it.
    async fn locate(&self, path: &str, create: bool) -> HandleResult<(Entry, String)> {
        let resolved = traverse::resolve(path)?;
        if create {
            self.require(PermissionMode::ReadWrite).await?;
        }
        let parent = traverse::walk(self.host.provider.as_ref(), &self.entry, &resolved.dirs, create).await?;
        Ok((parent, resolved.name))
    }

    async fn try_get_file(&self, path: &str, create: bool, mode: PermissionMode) -> HandleResult<FileNode> {
        let (parent, name) = self.locate(path, create).await?;
        let entry = self.host.provider.child_file(&parent, &name, create).await?;
        FileNode::open(self.host.clone(), entry, mode)
            .await
            .ok_or_else(|| HandleError::PermissionDenied(self.target(path)))
    }

    async fn try_get_directory(
        &self,
        path: &str,
        create: bool,
        mode: PermissionMode,
    ) -> HandleResult<DirectoryNode> {
        let (parent, name) = self.locate(path, create).await?;
        let entry = self.host.provider.child_directory(&parent, &name, create).await?;
        DirectoryNode::open(self.host.clone(), entry, mode)
            .await
            .ok_or_else(|| HandleError::PermissionDenied(self.target(path)))
    }

    async fn try_get(&self, path: &str, mode: PermissionMode) -> HandleResult<Node> {
        let (parent, name) = self.locate(path, false).await?;
        let entry = self.host.provider.child(&parent, &name).await?;
        Node::open(self.host.clone(), entry, mode)
            .await
            .ok_or_else(|| HandleError::PermissionDenied(self.target(path)))
    }

    async fn try_remove(&self, path: &str, recursive: bool) -> HandleResult<()> {
        let resolved = traverse::resolve(path)?;
        self.require(PermissionMode::ReadWrite).await?;
        let parent = traverse::walk(self.host.provider.as_ref(), &self.entry, &resolved.dirs, false).await?;
        self.host.provider.remove_child(&parent, &resolved.name, recursive).await?;
        Ok(())
    }

    /// Resolve `path` to a file, creating it (and missing parents) when
    /// `create` is set. Creating requires `ReadWrite` on this directory.
    pub async fn get_file(&self, path: &str, create: bool, mode: PermissionMode) -> Option<FileNode> {
        self.try_get_file(path, create, mode)
            .await
            .map_err(|e| log_boundary("get_file", &self.target(path), &e))
            .ok()
    }

    /// Resolve `path` to a directory, creating the chain when `create` is set.
    pub async fn get_directory(
        &self,
        path: &str,
        create: bool,
        mode: PermissionMode,
    ) -> Option<DirectoryNode> {
        self.try_get_directory(path, create, mode)
            .await
            .map_err(|e| log_boundary("get_directory", &self.target(path), &e))
            .ok()
    }

    /// Resolve `path` to whichever kind of entry exists there.
    pub async fn get(&self, path: &str, mode: PermissionMode) -> Option<Node> {
        self.try_get(path, mode)
            .await
            .map_err(|e| log_boundary("get", &self.target(path), &e))
            .ok()
    }

    /// Remove the entry at `path`. Non-empty directories need `recursive`.
    pub async fn remove(&self, path: &str, recursive: bool) -> bool {
        match self.try_remove(path, recursive).await {
            Ok(()) => {
                tracing::debug!(path = %self.target(path), "removed");
                true
            }
            Err(e) => {
                log_boundary("remove", &self.target(path), &e);
                false
            }
        }
    }

    /// Snapshot the subtree under this directory.
    pub async fn tree(&self, opts: ListOptions) -> Vec<TreeNode> {
        traverse::build_tree(self.host.provider.as_ref(), &self.entry, opts.filter(), opts.max_depth)
            .await
            .map_err(|e| log_boundary("tree", &self.target(""), &e))
            .unwrap_or_default()
    }

    /// Pre-order list of the entries in [`DirectoryNode::tree`].
    pub async fn list(&self, opts: ListOptions) -> Vec<Entry> {
        traverse::flatten(&self.tree(opts).await)
    }

    /// Names of the entries in [`DirectoryNode::list`].
    pub async fn names(&self, opts: ListOptions) -> Vec<String> {
        self.list(opts).await.into_iter().map(|e| e.name).collect()
    }

    /// Render the subtree as box-drawn lines joined by `\n`.
    pub async fn render(&self, opts: ListOptions) -> String {
        let nodes = self.tree(opts).await;
        traverse::render_lines(&self.entry.name, &nodes).join("\n")
    }

    /// Files under this directory whose relative path matches `pattern`.
    pub async fn glob(&self, pattern: &str) -> Vec<GlobMatch> {
        traverse::glob(
            self.host.provider.as_ref(),
            self.host.matcher.as_ref(),
            &self.entry,
            pattern,
        )
        .await
        .map_err(|e| log_boundary("glob", &self.target(""), &e))
        .unwrap_or_default()
    }

    /// Like [`DirectoryNode::glob`], passing each match through the access gate.
    ///
    /// Matches whose gate fails are left out.
    pub async fn glob_files(&self, pattern: &str, mode: PermissionMode) -> Vec<FileNode> {
        let mut files = Vec::new();
        for found in self.glob(pattern).await {
            if let Some(file) = FileNode::open(self.host.clone(), found.entry, mode).await {
                files.push(file);
            }
        }
        files
    }
}
