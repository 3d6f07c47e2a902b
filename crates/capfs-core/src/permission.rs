//! Permission broker and the access gate built on it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entry::Entry;

/// Access level requested for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionMode {
    #[default]
    Read,
    ReadWrite,
}

impl PermissionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionMode::Read => "read",
            PermissionMode::ReadWrite => "readwrite",
        }
    }

    /// Whether a grant for `self` also covers `other`.
    pub fn covers(self, other: PermissionMode) -> bool {
        self == PermissionMode::ReadWrite || other == PermissionMode::Read
    }
}

impl std::fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grant state reported by a broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    /// Not decided yet; an interactive request may still grant it.
    Prompt,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        self == PermissionState::Granted
    }
}

/// Host permission broker.
#[async_trait]
pub trait PermissionBroker: Send + Sync {
    /// Current grant state, without user interaction.
    async fn query(&self, entry: &Entry, mode: PermissionMode) -> PermissionState;

    /// Ask for a grant. May prompt the user.
    async fn request(&self, entry: &Entry, mode: PermissionMode) -> PermissionState;
}

/// Grants every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrantAll;

#[async_trait]
impl PermissionBroker for GrantAll {
    async fn query(&self, _entry: &Entry, _mode: PermissionMode) -> PermissionState {
        PermissionState::Granted
    }

    async fn request(&self, _entry: &Entry, _mode: PermissionMode) -> PermissionState {
        PermissionState::Granted
    }
}

/// Grants `Read`, denies `ReadWrite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyBroker;

#[async_trait]
impl PermissionBroker for ReadOnlyBroker {
    async fn query(&self, _entry: &Entry, mode: PermissionMode) -> PermissionState {
        match mode {
            PermissionMode::Read => PermissionState::Granted,
            PermissionMode::ReadWrite => PermissionState::Denied,
        }
    }

    async fn request(&self, entry: &Entry, mode: PermissionMode) -> PermissionState {
        self.query(entry, mode).await
    }
}

/// Denies every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

#[async_trait]
impl PermissionBroker for DenyAll {
    async fn query(&self, _entry: &Entry, _mode: PermissionMode) -> PermissionState {
        PermissionState::Denied
    }

    async fn request(&self, _entry: &Entry, _mode: PermissionMode) -> PermissionState {
        PermissionState::Denied
    }
}

/// Run the access gate for one `(entry, mode)` pair.
///
/// Queries first; only when that is not granted does it issue the
/// interactive request. The outcome is final for this call.
pub async fn verify(broker: &dyn PermissionBroker, entry: &Entry, mode: PermissionMode) -> bool {
    if broker.query(entry, mode).await.is_granted() {
        return true;
    }
    let granted = broker.request(entry, mode).await.is_granted();
    if granted {
        tracing::debug!(path = %entry.path.display(), %mode, "permission granted on request");
    } else {
        tracing::debug!(path = %entry.path.display(), %mode, "permission denied");
    }
    granted
}
