//! Subcommand execution.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use capfs_core::traverse::resolve;
use capfs_core::{DirectoryNode, FileNode, GlobMatcher, ListOptions, PermissionMode};

use crate::cli::{Command, ListArgs};
use crate::config::Config;

/// Open the directory a listing starts from. A path that resolves to the
/// current directory (none, `.`, `/`) means `root` itself.
async fn start_dir(root: &DirectoryNode, path: Option<&str>) -> Result<DirectoryNode> {
    match path {
        Some(p) if resolve(p).is_ok() => root
            .get_directory(p, false, PermissionMode::Read)
            .await
            .with_context(|| format!("{p}: no such directory")),
        _ => Ok(root.clone()),
    }
}

async fn existing_file(root: &DirectoryNode, path: &str) -> Result<FileNode> {
    root.get_file(path, false, PermissionMode::Read)
        .await
        .with_context(|| format!("{path}: no such file"))
}

fn list_options(args: &ListArgs, config: &Config) -> ListOptions {
    ListOptions {
        include_files: config.include_files && !args.no_files,
        include_directories: config.include_directories && !args.no_dirs,
        max_depth: args.depth.unwrap_or(config.max_depth),
    }
}

/// Path of `entry_path` relative to `base`, for display.
fn relative(entry_path: &Path, base: &Path) -> String {
    entry_path
        .strip_prefix(base)
        .unwrap_or(entry_path)
        .display()
        .to_string()
}

/// Run one subcommand against `root`, writing its output to `out`.
///
/// `stdin` supplies the data for `write` when no text argument is given.
pub async fn execute(
    command: &Command,
    root: &DirectoryNode,
    config: &Config,
    stdin: impl FnOnce() -> std::io::Result<Vec<u8>>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Tree(args) => {
            let dir = start_dir(root, args.path.as_deref()).await?;
            writeln!(out, "{}", dir.render(list_options(args, config)).await)?;
        }
        Command::Ls(args) => {
            let dir = start_dir(root, args.path.as_deref()).await?;
            for entry in dir.list(list_options(args, config)).await {
                let shown = relative(&entry.path, &dir.entry().path);
                if entry.is_dir() {
                    writeln!(out, "{shown}/")?;
                } else {
                    writeln!(out, "{shown}")?;
                }
            }
        }
        Command::Glob { pattern, ignore_case } => {
            let dir = if *ignore_case || config.case_insensitive {
                let host = root
                    .host()
                    .clone()
                    .with_matcher(Arc::new(GlobMatcher::case_insensitive()));
                DirectoryNode::open(host, root.entry().clone(), root.mode())
                    .await
                    .context("permission denied")?
            } else {
                root.clone()
            };
            for found in dir.glob(pattern).await {
                writeln!(out, "{}", found.path)?;
            }
        }
        Command::Cat { path } => {
            let file = existing_file(root, path).await?;
            let data = file.read().await.with_context(|| format!("{path}: read failed"))?;
            out.write_all(&data)?;
        }
        Command::Hash { path } => {
            let file = existing_file(root, path).await?;
            let digest = file.hash().await.with_context(|| format!("{path}: read failed"))?;
            writeln!(out, "{digest}  {path}")?;
        }
        Command::Write { path, text } => {
            let data = match text {
                Some(t) => t.clone().into_bytes(),
                None => stdin().context("Failed to read stdin")?,
            };
            let file = root
                .get_file(path, true, PermissionMode::ReadWrite)
                .await
                .with_context(|| format!("{path}: cannot create file"))?;
            if !file.write(&data).await {
                bail!("{path}: write failed");
            }
            tracing::info!(path, bytes = data.len(), "wrote file");
        }
        Command::Mkdir { path } => {
            root.get_directory(path, true, PermissionMode::Read)
                .await
                .with_context(|| format!("{path}: cannot create directory"))?;
        }
        Command::Rm { path, recursive } => {
            if !root.remove(path, *recursive).await {
                bail!("{path}: cannot remove");
            }
        }
    }
    Ok(())
}
