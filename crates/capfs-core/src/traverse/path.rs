//! Relative path resolution.

use crate::error::{HandleError, HandleResult};

/// A path split into the directories to walk and the entry they lead to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Directory names from the starting directory down to the parent.
    pub dirs: Vec<String>,
    /// Name of the addressed entry. Never empty.
    pub name: String,
}

/// Resolve a slash-separated path against a synthetic root.
///
/// `.` and empty segments are dropped, `..` pops but never climbs above
/// the root, and a leading `/` is the root itself. The last surviving
/// segment is the terminal name; if there is none (`""`, `"."`, `"/"`,
/// `"a/.."`), resolution fails, so the current directory is never a
/// valid target.
pub fn resolve(path: &str) -> HandleResult<ResolvedPath> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let name = segments
        .pop()
        .ok_or_else(|| HandleError::InvalidPath(path.to_string()))?;

    Ok(ResolvedPath {
        dirs: segments.into_iter().map(str::to_string).collect(),
        name: name.to_string(),
    })
}
