//! capfs command-line front end.
//!
//! Opens the `--root` directory through a [`LocalProvider`] and a
//! terminal permission broker, then runs one subcommand against it.

pub mod cli;
pub mod commands;
pub mod config;
pub mod prompt;

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use capfs_core::{DirectoryNode, GlobMatcher, Host, LocalProvider, PermissionMode};

use cli::Cli;
use config::Config;
use prompt::{TerminalBroker, WritePolicy};

/// Flags win over the config file.
pub fn write_policy(cli: &Cli, config: &Config) -> WritePolicy {
    if cli.read_only || (config.read_only && !cli.yes) {
        WritePolicy::Deny
    } else if cli.yes || config.assume_yes {
        WritePolicy::Allow
    } else {
        WritePolicy::Ask
    }
}

/// Open the root directory node for `cli`.
pub async fn open_root(cli: &Cli, config: &Config) -> Result<DirectoryNode> {
    if !cli.root.is_dir() {
        anyhow::bail!("{}: not a directory", cli.root.display());
    }
    let policy = write_policy(cli, config);
    let provider = if policy == WritePolicy::Deny {
        LocalProvider::read_only(&cli.root)
    } else {
        LocalProvider::new(&cli.root)
    };
    let matcher = if config.case_insensitive {
        GlobMatcher::case_insensitive()
    } else {
        GlobMatcher::new()
    };
    let host = Host::new(Arc::new(provider), Arc::new(TerminalBroker::new(policy, &cli.root)))
        .with_matcher(Arc::new(matcher));

    DirectoryNode::open_root(host, PermissionMode::Read)
        .await
        .with_context(|| format!("{}: permission denied", cli.root.display()))
}

/// Entry point used by `main`.
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    tracing::debug!(?config, root = %cli.root.display(), "starting");

    let root = open_root(&cli, &config).await?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::execute(
        &cli.command,
        &root,
        &config,
        || {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        },
        &mut out,
    )
    .await
}
