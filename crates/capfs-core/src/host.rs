//! The collaborators a node operates through.

use std::sync::Arc;

use crate::matcher::{GlobMatcher, PatternMatcher};
use crate::permission::{GrantAll, PermissionBroker};
use crate::provider::EntryProvider;

/// Provider, permission broker and pattern matcher, shared by every node
/// derived from the same root. Cheap to clone.
#[derive(Clone)]
pub struct Host {
    pub provider: Arc<dyn EntryProvider>,
    pub broker: Arc<dyn PermissionBroker>,
    pub matcher: Arc<dyn PatternMatcher>,
}

impl Host {
    /// Host with the default glob matcher.
    pub fn new(provider: Arc<dyn EntryProvider>, broker: Arc<dyn PermissionBroker>) -> Self {
        Self {
            provider,
            broker,
            matcher: Arc::new(GlobMatcher::new()),
        }
    }

    /// Host that grants every permission request.
    pub fn unrestricted(provider: Arc<dyn EntryProvider>) -> Self {
        Self::new(provider, Arc::new(GrantAll))
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn PatternMatcher>) -> Self {
        self.matcher = matcher;
        self
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("read_only", &self.provider.read_only())
            .finish_non_exhaustive()
    }
}
