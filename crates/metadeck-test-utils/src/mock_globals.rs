// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fake host globals, reactive runtime, diagnostics sink and settings store.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use metadeck_core::traits::{DiagnosticsSink, HostGlobals, ReactiveRuntime, SettingsStore};
use metadeck_core::types::{RuntimeConfig, Settings};
use metadeck_core::MetaDeckError;

/// A reactive runtime that counts `configure` calls.
pub struct CountingRuntime {
    id: String,
    configured: Mutex<Vec<RuntimeConfig>>,
    actions: AtomicUsize,
}

impl CountingRuntime {
    pub fn new(id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            configured: Mutex::new(Vec::new()),
            actions: AtomicUsize::new(0),
        })
    }

    pub fn configure_count(&self) -> usize {
        self.configured.lock().unwrap().len()
    }

    pub fn last_config(&self) -> Option<RuntimeConfig> {
        self.configured.lock().unwrap().last().copied()
    }

    pub fn action_count(&self) -> usize {
        self.actions.load(Ordering::SeqCst)
    }
}

impl ReactiveRuntime for CountingRuntime {
    fn id(&self) -> &str {
        &self.id
    }

    fn configure(&self, config: RuntimeConfig) -> Result<(), MetaDeckError> {
        self.configured.lock().unwrap().push(config);
        Ok(())
    }

    fn run_in_action(&self, action: &mut dyn FnMut()) {
        self.actions.fetch_add(1, Ordering::SeqCst);
        action();
    }
}

/// Host globals backed by in-memory maps. Slot paths are joined with `.`.
#[derive(Default)]
pub struct FakeHostGlobals {
    slots: Mutex<HashMap<String, Arc<dyn ReactiveRuntime>>>,
    flags: Mutex<HashSet<String>>,
}

impl FakeHostGlobals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `runtime` at `path`, e.g. `"mobx"` or `"DFL.mobx"`.
    pub fn with_runtime(self, path: &str, runtime: Arc<dyn ReactiveRuntime>) -> Self {
        self.slots.lock().unwrap().insert(path.to_string(), runtime);
        self
    }
}

impl HostGlobals for FakeHostGlobals {
    fn runtime_at(&self, path: &[&str]) -> Option<Arc<dyn ReactiveRuntime>> {
        self.slots.lock().unwrap().get(&path.join(".")).cloned()
    }

    fn flag(&self, name: &str) -> bool {
        self.flags.lock().unwrap().contains(name)
    }

    fn set_flag(&self, name: &str) {
        self.flags.lock().unwrap().insert(name.to_string());
    }
}

/// Diagnostics sink that keeps every line.
#[derive(Default)]
pub struct RecordingDiagnostics {
    lines: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn emit(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

/// Settings store held in memory.
#[derive(Default)]
pub struct MemorySettings {
    settings: tokio::sync::Mutex<Settings>,
    writes: AtomicUsize,
}

impl MemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: tokio::sync::Mutex::new(settings),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> Settings {
        self.settings.lock().await.clone()
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn read_settings(&self) -> Result<Settings, MetaDeckError> {
        Ok(self.settings.lock().await.clone())
    }

    async fn write_settings(&self, settings: &Settings) -> Result<(), MetaDeckError> {
        *self.settings.lock().await = settings.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
