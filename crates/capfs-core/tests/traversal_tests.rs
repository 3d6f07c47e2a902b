//! End-to-end traversal behavior through `DirectoryNode`.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;
use rstest::rstest;

use capfs_core::traverse::{build_tree, flatten};
use capfs_core::{
    Entry, FilterKind, GlobMatcher, ListOptions, PatternMatcher, PermissionMode, TreeNode,
};
use common::{memory_with, open_root, RecordingProvider};

// =============================================================================
// PATH POLICY
// =============================================================================

#[rstest]
#[case::empty("")]
#[case::dot(".")]
#[case::slash("/")]
#[tokio::test]
async fn current_directory_is_never_a_target(#[case] path: &str) {
    let root = open_root(Arc::new(memory_with(&["a.txt"]).await)).await;

    assert!(root.get_file(path, true, PermissionMode::ReadWrite).await.is_none());
    assert!(root.get_file(path, false, PermissionMode::Read).await.is_none());
    assert!(root.get_directory(path, true, PermissionMode::ReadWrite).await.is_none());
    assert!(root.get_directory(path, false, PermissionMode::Read).await.is_none());
    assert!(!root.remove(path, true).await);

    // Nothing was touched
    assert_eq!(root.names(ListOptions::default()).await, ["a.txt"]);
}

#[tokio::test]
async fn dotted_paths_resolve_like_plain_ones() {
    let root = open_root(Arc::new(memory_with(&["a/b/c.txt"]).await)).await;

    for path in ["a/b/c.txt", "/a/b/c.txt", "a/./b//c.txt", "a/x/../b/c.txt"] {
        let file = root.get_file(path, false, PermissionMode::Read).await;
        assert!(file.is_some(), "{path} should resolve");
    }
}

// =============================================================================
// TREE BUILDER
// =============================================================================

#[tokio::test]
async fn directories_only_prunes_and_excludes_files() {
    let fs = memory_with(&["top.txt", "d1/f1.txt", "d1/d2/f2.txt", "d3/f3.txt"]).await;
    let root = open_root(Arc::new(fs)).await;

    let entries = root.list(ListOptions::depth(10).files(false)).await;
    assert!(entries.iter().all(Entry::is_dir));
    let paths: Vec<_> = entries.iter().map(|e| e.path.display().to_string()).collect();
    assert_eq!(paths, ["d1", "d1/d2", "d3"]);
}

#[tokio::test]
async fn list_equals_flattened_tree() {
    let fs = memory_with(&["a.txt", "b/c.txt", "b/d/e.txt", "f/g.txt"]).await;
    let root = open_root(Arc::new(fs)).await;

    for opts in [
        ListOptions::depth(1),
        ListOptions::depth(2),
        ListOptions::depth(5),
        ListOptions::depth(5).files(false),
        ListOptions::depth(5).directories(false),
    ] {
        let from_tree = flatten(&root.tree(opts).await);
        assert_eq!(root.list(opts).await, from_tree, "{opts:?}");
    }
}

#[tokio::test]
async fn none_filter_never_enumerates() {
    let provider = Arc::new(RecordingProvider::new(memory_with(&["a/b.txt"]).await));
    let root = open_root(provider.clone()).await;

    let opts = ListOptions::depth(3).files(false).directories(false);
    assert!(root.tree(opts).await.is_empty());
    assert_eq!(root.render(opts).await, "/");
    assert_eq!(provider.listings(), 0);
}

#[tokio::test]
async fn unreadable_subdirectory_is_skipped() {
    let fs = memory_with(&["a/one.txt", "b/two.txt", "c/three.txt"]).await;
    let provider = Arc::new(RecordingProvider::new(fs).failing_at("b"));
    let root = open_root(provider).await;

    let paths: Vec<_> = root
        .list(ListOptions::depth(3))
        .await
        .into_iter()
        .map(|e| e.path.display().to_string())
        .collect();
    assert_eq!(paths, ["a", "a/one.txt", "b", "c", "c/three.txt"]);

    assert_eq!(
        root.render(ListOptions::depth(3)).await,
        "/\n├─ a/\n│  └─ one.txt\n├─ b/\n└─ c/\n   └─ three.txt"
    );
}

#[tokio::test]
async fn unreadable_root_yields_empty() {
    let provider = Arc::new(RecordingProvider::new(memory_with(&["x.txt"]).await).failing_at(""));
    let root = open_root(provider).await;

    assert!(root.list(ListOptions::depth(2)).await.is_empty());
    assert!(root.glob("*.txt").await.is_empty());
    assert_eq!(root.render(ListOptions::default()).await, "/");
}

// =============================================================================
// RENDERER
// =============================================================================

#[tokio::test]
async fn renders_spec_example() {
    let fs = memory_with(&["root/a.txt", "root/sub/b.txt"]).await;
    let root = open_root(Arc::new(fs)).await;
    let dir = root.get_directory("root", false, PermissionMode::Read).await.unwrap();

    let lines: Vec<String> = dir
        .render(ListOptions::depth(2))
        .await
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(lines, ["root/", "├─ a.txt", "└─ sub/", "   └─ b.txt"]);
}

// =============================================================================
// GLOB ENGINE
// =============================================================================

#[tokio::test]
async fn recursive_marker_spans_zero_or_more_levels() {
    let fs = memory_with(&["src/a.ts", "src/lib/b.ts", "a.ts", "src/c.md"]).await;
    let root = open_root(Arc::new(fs)).await;

    let found: BTreeSet<String> = root.glob("**/*.ts").await.into_iter().map(|m| m.path).collect();
    let expected: BTreeSet<String> = ["a.ts", "src/a.ts", "src/lib/b.ts"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(found, expected);
}

#[tokio::test]
async fn empty_pattern_touches_nothing() {
    let provider = Arc::new(RecordingProvider::new(memory_with(&["a.ts"]).await));
    let root = open_root(provider.clone()).await;

    assert!(root.glob("").await.is_empty());
    assert_eq!(provider.listings(), 0);
}

#[tokio::test]
async fn literal_segments_only_enter_matching_directories() {
    let fs = memory_with(&["src/a.rs", "docs/b.rs", "target/debug/c.rs"]).await;
    let provider = Arc::new(RecordingProvider::new(fs));
    let root = open_root(provider.clone()).await;

    let found: Vec<_> = root.glob("src/*.rs").await.into_iter().map(|m| m.path).collect();
    assert_eq!(found, ["src/a.rs"]);
    // root + src only
    assert_eq!(provider.listings(), 2);
}

#[tokio::test]
async fn glob_skips_unreadable_subtree() {
    let fs = memory_with(&["a/x.md", "b/y.md", "b/deep/z.md", "c/w.md"]).await;
    let provider = Arc::new(RecordingProvider::new(fs).failing_at("b"));
    let root = open_root(provider).await;

    let found: Vec<_> = root.glob("**/*.md").await.into_iter().map(|m| m.path).collect();
    assert_eq!(found, ["a/x.md", "c/w.md"]);
}

// =============================================================================
// PROPERTIES
// =============================================================================

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

fn file_sets() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-c](/[a-c]){0,3}\\.txt", 1..16)
}

fn max_depth(nodes: &[TreeNode], depth: usize, ceiling: usize) -> usize {
    nodes
        .iter()
        .map(|n| match &n.children {
            Some(kids) => {
                assert!(depth < ceiling, "children materialized at the ceiling");
                max_depth(kids, depth + 1, ceiling)
            }
            None => depth,
        })
        .max()
        .unwrap_or(depth.saturating_sub(1))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn tree_never_exceeds_max_depth(files in file_sets(), ceiling in 1usize..5) {
        runtime().block_on(async {
            let refs: Vec<&str> = files.iter().map(String::as_str).collect();
            let fs = memory_with(&refs).await;
            let tree = build_tree(&fs, &Entry::root(), FilterKind::All, ceiling).await.unwrap();
            assert!(max_depth(&tree, 1, ceiling) <= ceiling);
        });
    }

    #[test]
    fn directories_only_has_no_files(files in file_sets(), ceiling in 1usize..5) {
        runtime().block_on(async {
            let refs: Vec<&str> = files.iter().map(String::as_str).collect();
            let fs = memory_with(&refs).await;
            let tree = build_tree(&fs, &Entry::root(), FilterKind::DirectoriesOnly, ceiling)
                .await
                .unwrap();
            assert!(flatten(&tree).iter().all(Entry::is_dir));
        });
    }

    #[test]
    fn plain_glob_equals_brute_force(
        files in file_sets(),
        pattern in prop::sample::select(vec![
            "*.txt", "*/*.txt", "a/*.txt", "?/b/*.txt", "[ab]/*/*.txt", "c/c/c/c.txt", "*/*/*/*.txt",
        ]),
    ) {
        runtime().block_on(async {
            let refs: Vec<&str> = files.iter().map(String::as_str).collect();
            let root = open_root(Arc::new(memory_with(&refs).await)).await;

            let matcher = GlobMatcher::new();
            let expected: BTreeSet<String> = files
                .iter()
                .filter(|f| matcher.is_match(pattern, f))
                .cloned()
                .collect();
            let found: BTreeSet<String> =
                root.glob(pattern).await.into_iter().map(|m| m.path).collect();
            assert_eq!(found, expected, "pattern {pattern}");
        });
    }
}
