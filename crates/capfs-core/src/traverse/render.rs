//! Box-drawn tree rendering.
//!
//! ```text
//! root/
//! ├─ a.txt
//! └─ sub/
//!    └─ b.txt
//! ```

use crate::entry::Entry;
use crate::error::HandleResult;
use crate::provider::EntryProvider;

use super::tree::{build_tree, FilterKind, TreeNode};

const BRANCH: &str = "├─ ";
const LAST: &str = "└─ ";
const PIPE: &str = "│  ";
const BLANK: &str = "   ";

/// Render the subtree under `root` with the same filter and depth rules
/// as [`build_tree`].
pub async fn render(
    provider: &dyn EntryProvider,
    root: &Entry,
    filter: FilterKind,
    max_depth: usize,
) -> HandleResult<String> {
    let nodes = build_tree(provider, root, filter, max_depth).await?;
    Ok(render_lines(&root.name, &nodes).join("\n"))
}

/// Format an already-built snapshot, one string per line.
pub fn render_lines(root_name: &str, nodes: &[TreeNode]) -> Vec<String> {
    let mut lines = vec![format!("{root_name}/")];
    push_level(nodes, "", &mut lines);
    lines
}

fn push_level(nodes: &[TreeNode], indent: &str, lines: &mut Vec<String>) {
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i + 1 == nodes.len();
        let connector = if is_last { LAST } else { BRANCH };
        lines.push(format!("{indent}{connector}{}", label(&node.entry)));

        if let Some(children) = &node.children {
            let child_indent = format!("{indent}{}", if is_last { BLANK } else { PIPE });
            push_level(children, &child_indent, lines);
        }
    }
}

fn label(entry: &Entry) -> String {
    if entry.is_dir() {
        format!("{}/", entry.name)
    } else {
        entry.name.clone()
    }
}
