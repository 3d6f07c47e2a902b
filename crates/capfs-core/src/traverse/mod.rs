//! Hierarchical traversal engine.
//!
//! Stateless helpers that [`DirectoryNode`](crate::node::DirectoryNode)
//! composes into its public operations:
//!
//! - **path**: split a relative path into a directory chain and a terminal name
//! - **walk**: descend a directory chain, optionally creating it
//! - **tree**: depth-bounded, filtered subtree snapshots
//! - **glob**: pattern search with `**` support
//! - **render**: box-drawn text rendering of a snapshot
//!
//! Every helper re-enumerates the host on each call; nothing is cached.

pub mod glob;
pub mod path;
pub mod render;
pub mod tree;
pub mod walk;

pub use glob::{glob, GlobMatch, RECURSIVE_SEGMENT};
pub use path::{resolve, ResolvedPath};
pub use render::{render, render_lines};
pub use tree::{build_tree, flatten, FilterKind, ListOptions, TreeNode};
pub use walk::walk;
