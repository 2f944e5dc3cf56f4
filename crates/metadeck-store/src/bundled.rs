// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The runtime shipped with the plugin, used when the host shares none.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use metadeck_core::traits::ReactiveRuntime;
use metadeck_core::types::RuntimeConfig;
use metadeck_core::MetaDeckError;

/// Minimal local runtime: records its configuration and tracks action depth.
#[derive(Default)]
pub struct BundledRuntime {
    config: Mutex<Option<RuntimeConfig>>,
    depth: AtomicUsize,
}

impl BundledRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration applied through `configure`, if any.
    pub fn config(&self) -> Option<RuntimeConfig> {
        *self.config.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether an action is currently running.
    pub fn in_action(&self) -> bool {
        self.depth.load(Ordering::SeqCst) > 0
    }
}

impl ReactiveRuntime for BundledRuntime {
    fn id(&self) -> &str {
        "bundled"
    }

    fn configure(&self, config: RuntimeConfig) -> Result<(), MetaDeckError> {
        *self.config.lock().unwrap_or_else(|e| e.into_inner()) = Some(config);
        Ok(())
    }

    fn run_in_action(&self, action: &mut dyn FnMut()) {
        self.depth.fetch_add(1, Ordering::SeqCst);
        action();
        self.depth.fetch_sub(1, Ordering::SeqCst);
    }
}
