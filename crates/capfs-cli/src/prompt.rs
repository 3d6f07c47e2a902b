//! Terminal permission broker.
//!
//! Reads are always granted. Writes are denied outright in read-only
//! mode, granted outright with `--yes`, and otherwise confirmed on the
//! terminal. A confirmed grant covers the entry and everything below it
//! for the rest of the session.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use capfs_core::{Entry, PermissionBroker, PermissionMode, PermissionState};
use tokio::sync::Mutex;

/// How write requests are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    Deny,
    Ask,
    Allow,
}

pub struct TerminalBroker {
    policy: WritePolicy,
    display_root: PathBuf,
    granted: Mutex<Vec<PathBuf>>,
}

impl TerminalBroker {
    pub fn new(policy: WritePolicy, display_root: impl Into<PathBuf>) -> Self {
        Self {
            policy,
            display_root: display_root.into(),
            granted: Mutex::new(Vec::new()),
        }
    }

    async fn covered(&self, entry: &Entry) -> bool {
        self.granted
            .lock()
            .await
            .iter()
            .any(|g| entry.path.starts_with(g))
    }

    async fn ask(&self, entry: &Entry) -> bool {
        let shown = self.display_root.join(&entry.path);
        let question = format!("capfs: allow write access to {}? [y/N] ", shown.display());
        let answer = tokio::task::spawn_blocking(move || -> std::io::Result<String> {
            let mut stderr = std::io::stderr();
            stderr.write_all(question.as_bytes())?;
            stderr.flush()?;
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => parse_answer(&line),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "could not read permission answer");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "permission prompt task failed");
                false
            }
        }
    }
}

fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl PermissionBroker for TerminalBroker {
    async fn query(&self, entry: &Entry, mode: PermissionMode) -> PermissionState {
        match (mode, self.policy) {
            (PermissionMode::Read, _) | (_, WritePolicy::Allow) => PermissionState::Granted,
            (_, WritePolicy::Deny) => PermissionState::Denied,
            (_, WritePolicy::Ask) => {
                if self.covered(entry).await {
                    PermissionState::Granted
                } else {
                    PermissionState::Prompt
                }
            }
        }
    }

    async fn request(&self, entry: &Entry, mode: PermissionMode) -> PermissionState {
        match self.query(entry, mode).await {
            PermissionState::Prompt => {}
            decided => return decided,
        }
        if self.ask(entry).await {
            self.granted.lock().await.push(entry.path.clone());
            PermissionState::Granted
        } else {
            PermissionState::Denied
        }
    }
}
