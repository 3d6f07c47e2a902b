//! CLI configuration.
//!
//! Loaded from `$XDG_CONFIG_HOME/capfs/config.toml` when present. Every
//! field has a default, and command-line flags override file values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

fn default_max_depth() -> usize {
    3
}

fn default_true_val() -> bool {
    true
}

/// Settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default depth for `tree` and `ls`.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_true_val")]
    pub include_files: bool,
    #[serde(default = "default_true_val")]
    pub include_directories: bool,
    /// Deny every write without asking.
    #[serde(default)]
    pub read_only: bool,
    /// Grant writes without asking.
    #[serde(default)]
    pub assume_yes: bool,
    /// Match glob patterns case-insensitively.
    #[serde(default)]
    pub case_insensitive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            include_files: true,
            include_directories: true,
            read_only: false,
            assume_yes: false,
            case_insensitive: false,
        }
    }
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|d| d.config_dir().join("capfs").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => p,
            None => return Ok(Self::default()),
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn fields_override_defaults() {
        let cfg = Config::parse("max_depth = 7\nread_only = true\ninclude_files = false\n").unwrap();
        assert_eq!(cfg.max_depth, 7);
        assert!(cfg.read_only);
        assert!(!cfg.include_files);
        assert!(cfg.include_directories);
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(Config::parse("colour = \"red\"").is_err());
    }

    #[test]
    fn missing_file_is_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = Config::load(Some(tmp.path().join("nope.toml").as_path())).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn loads_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "assume_yes = true\n").unwrap();
        assert!(Config::load(Some(path.as_path())).unwrap().assume_yes);
    }
}
