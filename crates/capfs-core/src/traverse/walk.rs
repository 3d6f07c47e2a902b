//! Directory-chain walking.

use crate::entry::Entry;
use crate::error::{HandleError, HandleResult};
use crate::provider::EntryProvider;

/// Descend `segments` from `root`, one child-directory lookup per segment.
///
/// With `create` set, missing directories are created on the way down.
/// Fails on the first lookup that fails.
pub async fn walk(
    provider: &dyn EntryProvider,
    root: &Entry,
    segments: &[String],
    create: bool,
) -> HandleResult<Entry> {
    if !root.is_dir() {
        return Err(HandleError::KindMismatch {
            name: root.name.clone(),
            expected: "directory",
        });
    }

    let mut current = root.clone();
    for segment in segments {
        current = provider.child_directory(&current, segment, create).await?;
        tracing::trace!(path = %current.path.display(), "walked");
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryProvider;

    fn segs(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn walks_existing_chain() {
        let fs = MemoryProvider::new();
        fs.mkdir_path("a/b/c").await.unwrap();

        let end = walk(&fs, &Entry::root(), &segs(&["a", "b", "c"]), false).await.unwrap();
        assert_eq!(end.path, std::path::PathBuf::from("a/b/c"));
        assert!(end.is_dir());
    }

    #[tokio::test]
    async fn empty_chain_is_root() {
        let fs = MemoryProvider::new();
        let end = walk(&fs, &Entry::root(), &[], false).await.unwrap();
        assert_eq!(end, Entry::root());
    }

    #[tokio::test]
    async fn missing_without_create_fails() {
        let fs = MemoryProvider::new();
        fs.mkdir_path("a").await.unwrap();

        let err = walk(&fs, &Entry::root(), &segs(&["a", "missing"]), false).await.unwrap_err();
        assert!(matches!(err, HandleError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_builds_chain() {
        let fs = MemoryProvider::new();
        walk(&fs, &Entry::root(), &segs(&["x", "y"]), true).await.unwrap();
        assert!(fs.entry("x/y").await.unwrap().is_dir());
    }

    #[tokio::test]
    async fn file_in_chain_is_collision() {
        let fs = MemoryProvider::new();
        fs.write_path("a/file", b"").await.unwrap();

        let err = walk(&fs, &Entry::root(), &segs(&["a", "file", "deeper"]), true)
            .await
            .unwrap_err();
        assert!(matches!(err, HandleError::KindMismatch { .. }));
        assert!(fs.entry("a/file/deeper").await.is_none());
    }
}
