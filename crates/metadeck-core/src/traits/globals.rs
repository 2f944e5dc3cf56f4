// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host-global lookup and the reactive runtime it may hold.

use std::sync::Arc;

use crate::error::MetaDeckError;
use crate::types::RuntimeConfig;

/// An observable-state runtime, either shared by the host or bundled with
/// the plugin.
pub trait ReactiveRuntime: Send + Sync {
    /// Identifier of this runtime instance, for diagnostics.
    fn id(&self) -> &str;

    /// Apply process-wide runtime options.
    fn configure(&self, config: RuntimeConfig) -> Result<(), MetaDeckError>;

    /// Run `action` as a single batched state mutation.
    fn run_in_action(&self, action: &mut dyn FnMut());
}

/// Process-global slots provided by the host application.
pub trait HostGlobals: Send + Sync {
    /// The runtime stored at the slot `path` (e.g. `["mobx"]`), if any.
    fn runtime_at(&self, path: &[&str]) -> Option<Arc<dyn ReactiveRuntime>>;

    /// Whether the boolean slot `name` is set.
    fn flag(&self, name: &str) -> bool;

    /// Set the boolean slot `name`.
    fn set_flag(&self, name: &str);
}
