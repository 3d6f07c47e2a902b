//! Depth-bounded subtree snapshots.
//!
//! Filtering happens on each raw child list *before* recursing, so a
//! directory rejected by the filter is never descended into and none of
//! its descendants can appear, even ones that would pass the filter.

use futures::future::{BoxFuture, FutureExt};

use crate::entry::Entry;
use crate::error::HandleResult;
use crate::provider::EntryProvider;

/// Which entry kinds a traversal includes (and descends into).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    None,
    FilesOnly,
    DirectoriesOnly,
    All,
}

impl FilterKind {
    pub fn from_flags(include_files: bool, include_directories: bool) -> Self {
        match (include_files, include_directories) {
            (false, false) => FilterKind::None,
            (true, false) => FilterKind::FilesOnly,
            (false, true) => FilterKind::DirectoriesOnly,
            (true, true) => FilterKind::All,
        }
    }

    pub fn accepts(self, entry: &Entry) -> bool {
        match self {
            FilterKind::None => false,
            FilterKind::FilesOnly => entry.is_file(),
            FilterKind::DirectoriesOnly => entry.is_dir(),
            FilterKind::All => true,
        }
    }
}

/// Parameters shared by listing, tree building and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub include_files: bool,
    pub include_directories: bool,
    /// 1 lists direct children only. 0 is treated as 1.
    pub max_depth: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            include_files: true,
            include_directories: true,
            max_depth: 1,
        }
    }
}

impl ListOptions {
    pub fn depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    pub fn files(mut self, include: bool) -> Self {
        self.include_files = include;
        self
    }

    pub fn directories(mut self, include: bool) -> Self {
        self.include_directories = include;
        self
    }

    pub fn filter(&self) -> FilterKind {
        FilterKind::from_flags(self.include_files, self.include_directories)
    }
}

/// One entry of a subtree snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub entry: Entry,
    /// `None` for files, for directories at the depth ceiling, and for
    /// directories that could not be enumerated.
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn leaf(entry: Entry) -> Self {
        Self {
            entry,
            children: None,
        }
    }
}

/// Snapshot the subtree under `root` down to `max_depth` levels.
///
/// Fails only if `root` itself cannot be enumerated. A deeper directory
/// that fails is kept as a leaf and traversal moves on.
pub async fn build_tree(
    provider: &dyn EntryProvider,
    root: &Entry,
    filter: FilterKind,
    max_depth: usize,
) -> HandleResult<Vec<TreeNode>> {
    if filter == FilterKind::None {
        return Ok(Vec::new());
    }
    let children = filtered_children(provider, root, filter).await?;
    Ok(build_level(provider, children, filter, 1, max_depth.max(1)).await)
}

async fn filtered_children(
    provider: &dyn EntryProvider,
    dir: &Entry,
    filter: FilterKind,
) -> HandleResult<Vec<Entry>> {
    let mut children = provider.children(dir).await?;
    children.retain(|e| filter.accepts(e));
    Ok(children)
}

fn build_level<'a>(
    provider: &'a dyn EntryProvider,
    entries: Vec<Entry>,
    filter: FilterKind,
    depth: usize,
    max_depth: usize,
) -> BoxFuture<'a, Vec<TreeNode>> {
    async move {
        let mut nodes = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.is_file() || depth >= max_depth {
                nodes.push(TreeNode::leaf(entry));
                continue;
            }
            let children = match filtered_children(provider, &entry, filter).await {
                Ok(kids) => Some(build_level(provider, kids, filter, depth + 1, max_depth).await),
                Err(e) => {
                    tracing::warn!(path = %entry.path.display(), error = %e, "skipping unreadable directory");
                    None
                }
            };
            nodes.push(TreeNode { entry, children });
        }
        nodes
    }
    .boxed()
}

/// Pre-order flattening: every node's entry precedes its children's.
pub fn flatten(nodes: &[TreeNode]) -> Vec<Entry> {
    let mut out = Vec::new();
    let mut stack: Vec<&TreeNode> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(node.entry.clone());
        if let Some(children) = &node.children {
            stack.extend(children.iter().rev());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryProvider;
    use rstest::rstest;

    async fn sample() -> MemoryProvider {
        let fs = MemoryProvider::new();
        fs.write_path("a.txt", b"").await.unwrap();
        fs.write_path("sub/b.txt", b"").await.unwrap();
        fs.write_path("sub/deep/c.txt", b"").await.unwrap();
        fs.mkdir_path("empty").await.unwrap();
        fs
    }

    fn names(entries: &[Entry]) -> Vec<String> {
        entries.iter().map(|e| e.path.display().to_string()).collect()
    }

    #[rstest]
    #[case(false, false, FilterKind::None)]
    #[case(true, false, FilterKind::FilesOnly)]
    #[case(false, true, FilterKind::DirectoriesOnly)]
    #[case(true, true, FilterKind::All)]
    fn filter_from_flags(#[case] files: bool, #[case] dirs: bool, #[case] expected: FilterKind) {
        assert_eq!(FilterKind::from_flags(files, dirs), expected);
    }

    #[tokio::test]
    async fn depth_one_is_direct_children() {
        let fs = sample().await;
        let tree = build_tree(&fs, &Entry::root(), FilterKind::All, 1).await.unwrap();

        assert_eq!(names(&flatten(&tree)), ["a.txt", "empty", "sub"]);
        assert!(tree.iter().all(|n| n.children.is_none()));
    }

    #[tokio::test]
    async fn nested_children_attach_below_ceiling() {
        let fs = sample().await;
        let tree = build_tree(&fs, &Entry::root(), FilterKind::All, 2).await.unwrap();

        let sub = tree.iter().find(|n| n.entry.name == "sub").unwrap();
        let kids = sub.children.as_ref().unwrap();
        assert_eq!(names(&flatten(kids)), ["sub/b.txt", "sub/deep"]);
        // sub/deep sits at the ceiling
        assert!(kids[1].children.is_none());

        let empty = tree.iter().find(|n| n.entry.name == "empty").unwrap();
        assert_eq!(empty.children.as_deref(), Some(&[][..]));
    }

    #[tokio::test]
    async fn flatten_is_preorder() {
        let fs = sample().await;
        let tree = build_tree(&fs, &Entry::root(), FilterKind::All, 8).await.unwrap();
        assert_eq!(
            names(&flatten(&tree)),
            ["a.txt", "empty", "sub", "sub/b.txt", "sub/deep", "sub/deep/c.txt"]
        );
    }

    #[tokio::test]
    async fn files_only_prunes_directories() {
        let fs = sample().await;
        let tree = build_tree(&fs, &Entry::root(), FilterKind::FilesOnly, 8).await.unwrap();
        // sub/b.txt is never reached: its parent was filtered out
        assert_eq!(names(&flatten(&tree)), ["a.txt"]);
    }

    #[tokio::test]
    async fn none_filter_is_empty() {
        let fs = sample().await;
        let tree = build_tree(&fs, &Entry::root(), FilterKind::None, 8).await.unwrap();
        assert!(tree.is_empty());
    }

    #[tokio::test]
    async fn zero_depth_behaves_like_one() {
        let fs = sample().await;
        let zero = build_tree(&fs, &Entry::root(), FilterKind::All, 0).await.unwrap();
        let one = build_tree(&fs, &Entry::root(), FilterKind::All, 1).await.unwrap();
        assert_eq!(zero, one);
    }

    #[tokio::test]
    async fn missing_root_is_error() {
        let fs = MemoryProvider::new();
        let result = build_tree(&fs, &Entry::directory("nope"), FilterKind::All, 1).await;
        assert!(result.is_err());
    }
}
