// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timeout-bounded resolution of the selectable API server list.
//!
//! Each resolution fetches the official list once, raced against a timeout.
//! When the timeout wins, the fetch future is dropped and its eventual result
//! is never observed. Whatever the fetch outcome, the merge step runs and
//! produces a usable list. The official list is fetched fresh on every
//! resolution. When resolutions overlap, only the most recently started one
//! updates [`ProviderServerResolver::state`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use metadeck_core::traits::OfficialServerSource;
use metadeck_core::types::{ApiServer, ServerOption};
use metadeck_core::MetaDeckError;
use tracing::{debug, warn};

use crate::merge::merge_servers;

/// How long the official list fetch may take.
pub const OFFICIAL_FETCH_TIMEOUT: Duration = Duration::from_millis(5000);

/// What happened to the official list during a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfficialStatus {
    /// The list was fetched; holds the number of official servers.
    Fetched(usize),
    /// The fetch failed or timed out; holds the reason.
    Unavailable(String),
}

/// Result of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub servers: Vec<ApiServer>,
    pub official: OfficialStatus,
}

impl Resolution {
    /// Dropdown options, labelled `"{name} ({url})"`.
    pub fn options(&self) -> Vec<ServerOption> {
        self.servers.iter().cloned().map(ServerOption::from).collect()
    }
}

/// Resolver lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResolverState {
    #[default]
    Idle,
    Resolving,
    Resolved(Resolution),
    /// The official list was unavailable; the resolution still carries the
    /// merged custom and selected servers.
    Failed(Resolution),
}

/// Resolves the merged server list for a provider.
pub struct ProviderServerResolver {
    source: Arc<dyn OfficialServerSource>,
    timeout: Duration,
    generation: AtomicU64,
    state: Mutex<ResolverState>,
}

impl ProviderServerResolver {
    pub fn new(source: Arc<dyn OfficialServerSource>) -> Self {
        Self::with_timeout(source, OFFICIAL_FETCH_TIMEOUT)
    }

    pub fn with_timeout(source: Arc<dyn OfficialServerSource>, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            generation: AtomicU64::new(0),
            state: Mutex::new(ResolverState::Idle),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The state after the most recent transition.
    pub fn state(&self) -> ResolverState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Store `state` unless a resolution newer than `generation` started.
    fn set_state(&self, generation: u64, state: ResolverState) -> bool {
        let mut current = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        *current = state;
        true
    }

    /// Fetch the official list and merge it with `custom` and `selected`.
    ///
    /// Never fails: an unavailable official list is logged and treated as
    /// empty.
    pub async fn resolve(&self, custom: &[ApiServer], selected: Option<&ApiServer>) -> Resolution {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_state(generation, ResolverState::Resolving);

        let fetched = match tokio::time::timeout(self.timeout, self.source.fetch_official()).await {
            Ok(result) => result,
            Err(_elapsed) => Err(MetaDeckError::Timeout {
                duration: self.timeout,
            }),
        };

        let (official, status) = match fetched {
            Ok(official) => {
                let count = official.len();
                (official, OfficialStatus::Fetched(count))
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "failed to load official API server list, using custom/current servers only"
                );
                (Vec::new(), OfficialStatus::Unavailable(e.to_string()))
            }
        };

        let resolution = Resolution {
            servers: merge_servers(&official, custom, selected),
            official: status,
        };
        debug!(
            servers = resolution.servers.len(),
            official = ?resolution.official,
            "API server list resolved"
        );

        let settled = match resolution.official {
            OfficialStatus::Fetched(_) => ResolverState::Resolved(resolution.clone()),
            OfficialStatus::Unavailable(_) => ResolverState::Failed(resolution.clone()),
        };
        if !self.set_state(generation, settled) {
            debug!(generation, "newer resolution started, state left unchanged");
        }
        resolution
    }
}
