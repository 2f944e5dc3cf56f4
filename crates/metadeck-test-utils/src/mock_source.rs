// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Official server list sources for resolver tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use metadeck_core::traits::provider::OfficialServerSource;
use metadeck_core::types::ApiServer;
use metadeck_core::MetaDeckError;

/// Returns a fixed list (or a fixed error) after an optional delay.
pub struct StaticServerSource {
    servers: Option<Vec<ApiServer>>,
    delay: Duration,
    fetches: AtomicUsize,
}

impl StaticServerSource {
    /// A source that succeeds with `servers`.
    pub fn new(servers: Vec<ApiServer>) -> Self {
        Self {
            servers: Some(servers),
            delay: Duration::ZERO,
            fetches: AtomicUsize::new(0),
        }
    }

    /// A source whose fetch always fails.
    pub fn failing() -> Self {
        Self {
            servers: None,
            delay: Duration::ZERO,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Delay every fetch by `delay` (virtual time under `start_paused`).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of fetches started.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OfficialServerSource for StaticServerSource {
    async fn fetch_official(&self) -> Result<Vec<ApiServer>, MetaDeckError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.servers.clone().ok_or_else(|| MetaDeckError::Provider {
            message: "network unreachable".to_string(),
            source: None,
        })
    }
}

/// Answers fetch `n` with `[call{n} -> u{n}]` after the `n`-th configured
/// delay, so overlapping fetches can settle out of order.
pub struct SequencedServerSource {
    delays: Vec<Duration>,
    fetches: AtomicUsize,
}

impl SequencedServerSource {
    pub fn new(delays: Vec<Duration>) -> Self {
        Self {
            delays,
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl OfficialServerSource for SequencedServerSource {
    async fn fetch_official(&self) -> Result<Vec<ApiServer>, MetaDeckError> {
        let call = self.fetches.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.get(call).copied().unwrap_or_default();
        tokio::time::sleep(delay).await;
        Ok(vec![ApiServer::new(format!("call{call}"), format!("u{call}"))])
    }
}

/// A source whose fetch never settles.
#[derive(Default)]
pub struct PendingServerSource;

#[async_trait]
impl OfficialServerSource for PendingServerSource {
    async fn fetch_official(&self) -> Result<Vec<ApiServer>, MetaDeckError> {
        std::future::pending().await
    }
}
