// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-time runtime resolution and configuration.
//!
//! Two guards apply. The [`StoreBootstrap`] slot caches the resolved handle
//! for this plugin instance. The [`CONFIGURED_FLAG`] host global records that
//! some instance already configured the shared runtime, so a duplicated
//! plugin instance in the same host process skips configuration too. Both are
//! checked and set under the slot lock, without suspension in between.

use std::sync::{Arc, Mutex, PoisonError};

use metadeck_core::traits::{HostGlobals, ReactiveRuntime};
use metadeck_core::types::RuntimeConfig;
use metadeck_core::MetaDeckError;
use tracing::{debug, error, info};

use crate::lookup::{LookupChain, RuntimeSource};

/// Host global flag set once the shared runtime has been configured.
pub const CONFIGURED_FLAG: &str = "__MetaDeckMobxConfigured";

/// The resolved runtime and where it was found.
#[derive(Clone)]
pub struct StoreHandle {
    runtime: Arc<dyn ReactiveRuntime>,
    source: RuntimeSource,
}

impl StoreHandle {
    pub fn runtime(&self) -> &Arc<dyn ReactiveRuntime> {
        &self.runtime
    }

    pub fn source(&self) -> RuntimeSource {
        self.source
    }

    /// Run `action` as one batched mutation on the runtime.
    pub fn run_in_action<T>(&self, action: impl FnOnce() -> T) -> T {
        let mut action = Some(action);
        let mut result = None;
        self.runtime.run_in_action(&mut || {
            if let Some(action) = action.take() {
                result = Some(action());
            }
        });
        match (result, action) {
            (Some(result), _) => result,
            // The runtime skipped the action; run it unbatched.
            (None, Some(action)) => action(),
            (None, None) => unreachable!("action ran without producing a result"),
        }
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("runtime", &self.runtime.id())
            .field("source", &self.source)
            .finish()
    }
}

/// Holds the handle resolved by the first successful bootstrap.
pub struct StoreBootstrap {
    slot: Mutex<Option<StoreHandle>>,
}

impl StoreBootstrap {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Resolve and configure the runtime, or return the cached handle.
    ///
    /// Safe to call repeatedly: the runtime's `configure` runs at most once
    /// per host process. Fails loudly when no runtime can be found at all.
    pub fn bootstrap(
        &self,
        host: &dyn HostGlobals,
        chain: &LookupChain,
    ) -> Result<StoreHandle, MetaDeckError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.as_ref() {
            debug!(source = %handle.source, "reactive runtime already bootstrapped");
            return Ok(handle.clone());
        }

        let Some((runtime, source)) = chain.resolve(host) else {
            error!("no reactive runtime in host globals and none bundled; state layer cannot start");
            return Err(MetaDeckError::RuntimeUnavailable(
                "neither the host nor the plugin bundle provides a reactive runtime".to_string(),
            ));
        };

        if host.flag(CONFIGURED_FLAG) {
            debug!(runtime = runtime.id(), "reactive runtime configured by another instance");
        } else {
            runtime.configure(RuntimeConfig::PLUGIN)?;
            host.set_flag(CONFIGURED_FLAG);
            debug!(runtime = runtime.id(), "reactive runtime configured");
        }

        info!(source = %source, runtime = runtime.id(), "reactive runtime ready");
        let handle = StoreHandle { runtime, source };
        *slot = Some(handle.clone());
        Ok(handle)
    }

    /// The cached handle, if bootstrap has succeeded.
    pub fn handle(&self) -> Option<StoreHandle> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for StoreBootstrap {
    fn default() -> Self {
        Self::new()
    }
}

static PROCESS_STORE: StoreBootstrap = StoreBootstrap::new();

/// Bootstrap the process-wide store. See [`StoreBootstrap::bootstrap`].
pub fn bootstrap(
    host: &dyn HostGlobals,
    chain: &LookupChain,
) -> Result<StoreHandle, MetaDeckError> {
    PROCESS_STORE.bootstrap(host, chain)
}

/// The process-wide store handle, if bootstrapped.
pub fn store() -> Option<StoreHandle> {
    PROCESS_STORE.handle()
}

/// The process-wide bootstrap slot itself.
pub fn process_store() -> &'static StoreBootstrap {
    &PROCESS_STORE
}
