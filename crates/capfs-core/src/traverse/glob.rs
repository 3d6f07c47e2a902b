//! Glob search over a directory hierarchy.
//!
//! The pattern is split on `/`. Non-final segments steer the descent:
//! a plain segment only enters subdirectories whose name matches it, and
//! `**` enters every subdirectory without being consumed. At the final
//! segment the direct files of the current directory are tested, with
//! their full relative path, against the whole pattern.
//!
//! `**` also matches zero levels: at a `**` step the files of the current
//! directory are tested as if the final segment had been reached.

use crate::entry::Entry;
use crate::error::HandleResult;
use crate::matcher::PatternMatcher;
use crate::provider::EntryProvider;

/// The segment matching any number of directory levels.
pub const RECURSIVE_SEGMENT: &str = "**";

/// A file found by a glob search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobMatch {
    /// `/`-joined path relative to the search root.
    pub path: String,
    pub entry: Entry,
}

struct Frame {
    index: usize,
    dir: Entry,
    prefix: String,
}

/// Find every file under `root` whose relative path matches `pattern`.
///
/// Results come in depth-first traversal order. Traversal runs on an
/// explicit stack, so directory depth is bounded only by memory. A
/// subdirectory that cannot be enumerated is skipped; failure to
/// enumerate `root` itself is an error.
pub async fn glob(
    provider: &dyn EntryProvider,
    matcher: &dyn PatternMatcher,
    root: &Entry,
    pattern: &str,
) -> HandleResult<Vec<GlobMatch>> {
    if pattern.is_empty() {
        return Ok(Vec::new());
    }

    let segments: Vec<&str> = pattern.split('/').collect();
    let last = segments.len() - 1;

    let mut matches = Vec::new();
    let mut stack = vec![Frame {
        index: 0,
        dir: root.clone(),
        prefix: String::new(),
    }];
    let mut at_root = true;

    while let Some(frame) = stack.pop() {
        let children = match provider.children(&frame.dir).await {
            Ok(children) => children,
            Err(e) if at_root => return Err(e.into()),
            Err(e) => {
                tracing::warn!(path = %frame.dir.path.display(), error = %e, "glob: skipping unreadable directory");
                continue;
            }
        };
        at_root = false;

        let segment = segments[frame.index];
        if frame.index == last || segment == RECURSIVE_SEGMENT {
            for file in children.iter().filter(|e| e.is_file()) {
                let candidate = format!("{}{}", frame.prefix, file.name);
                if matcher.is_match(pattern, &candidate) {
                    matches.push(GlobMatch {
                        path: candidate,
                        entry: file.clone(),
                    });
                }
            }
        }
        if frame.index == last {
            continue;
        }

        let next = if segment == RECURSIVE_SEGMENT {
            frame.index
        } else {
            frame.index + 1
        };

        // Pushed in reverse so subdirectories pop in host order.
        for dir in children.into_iter().rev().filter(|e| e.is_dir()) {
            if next != frame.index || matcher.is_match(segment, &dir.name) {
                let prefix = format!("{}{}/", frame.prefix, dir.name);
                stack.push(Frame {
                    index: next,
                    dir,
                    prefix,
                });
            }
        }
    }

    tracing::debug!(pattern, count = matches.len(), "glob complete");
    Ok(matches)
}
