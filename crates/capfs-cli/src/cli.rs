//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "capfs", version, about = "Browse and edit a directory through capability-gated handles")]
pub struct Cli {
    /// Directory every path is relative to.
    #[arg(long, short = 'C', default_value = ".", global = true)]
    pub root: PathBuf,

    /// Config file (defaults to $XDG_CONFIG_HOME/capfs/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Deny every write.
    #[arg(long, global = true, conflicts_with = "yes")]
    pub read_only: bool,

    /// Grant writes without asking.
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a box-drawn tree.
    Tree(ListArgs),
    /// List entries in pre-order.
    Ls(ListArgs),
    /// Print files matching a glob pattern.
    Glob {
        pattern: String,
        /// Match case-insensitively.
        #[arg(long, short = 'i')]
        ignore_case: bool,
    },
    /// Print a file.
    Cat { path: String },
    /// Print the SHA-256 of a file.
    Hash { path: String },
    /// Write TEXT (or stdin) to a file, creating it and its parents.
    Write { path: String, text: Option<String> },
    /// Create a directory and its parents.
    Mkdir { path: String },
    /// Remove a file or directory.
    Rm {
        path: String,
        /// Remove non-empty directories.
        #[arg(long, short = 'r')]
        recursive: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Directory to start from (defaults to the root).
    pub path: Option<String>,
    /// Maximum depth (defaults to the configured value).
    #[arg(long, short = 'd')]
    pub depth: Option<usize>,
    /// Leave files out.
    #[arg(long)]
    pub no_files: bool,
    /// Leave directories out, and do not descend.
    #[arg(long)]
    pub no_dirs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tree_flags() {
        let cli = Cli::parse_from(["capfs", "-C", "/tmp", "tree", "src", "-d", "2", "--no-files"]);
        assert_eq!(cli.root, PathBuf::from("/tmp"));
        let Command::Tree(args) = cli.command else {
            panic!("expected tree");
        };
        assert_eq!(args.path.as_deref(), Some("src"));
        assert_eq!(args.depth, Some(2));
        assert!(args.no_files);
        assert!(!args.no_dirs);
    }

    #[test]
    fn read_only_conflicts_with_yes() {
        assert!(Cli::try_parse_from(["capfs", "--read-only", "--yes", "ls"]).is_err());
    }

    #[test]
    fn verify_command() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
