// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin activation and deactivation.
//!
//! [`activate`] bootstraps the reactive store, builds the bus, the mount
//! registry and the state object, emits the boot diagnostics, adds the
//! plugin pages and registers every mount. The server option list is
//! resolved in the background once the pages are mounted. The returned
//! [`ActivePlugin`] undoes the registration in [`ActivePlugin::on_dismount`].

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use metadeck_config::MetaDeckConfig;
use metadeck_core::events::MetaDeckBus;
use metadeck_core::traits::{
    DiagnosticsSink, HostGlobals, HostRouter, OfficialServerSource, ReactiveRuntime, SettingsStore,
};
use metadeck_core::types::RenderFn;
use metadeck_core::MetaDeckError;
use metadeck_mounts::{Mounts, Teardown};
use metadeck_provider::{HttpServerList, IgdbServerSettings, ProviderServerResolver};
use metadeck_settings::JsonFileSettings;
use metadeck_store::{process_store, BundledRuntime, LookupChain, StoreBootstrap};
use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::diag::{diagnostics_for, emit_diag};
use crate::state::{MetaDeckState, MetadataModules};

pub const SETTINGS_ROUTE: &str = "/metadeck/settings";
pub const MODULE_ROUTE: &str = "/metadeck/:module";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything the host provides to an activation.
pub struct PluginHost {
    pub name: String,
    pub router: Arc<dyn HostRouter>,
    pub globals: Arc<dyn HostGlobals>,
    /// Runtime shipped with the plugin, used when the host has none.
    pub bundled_runtime: Option<Arc<dyn ReactiveRuntime>>,
    pub settings: Arc<dyn SettingsStore>,
    pub official_source: Arc<dyn OfficialServerSource>,
    pub fetch_timeout: Duration,
    pub diagnostics: Arc<dyn DiagnosticsSink>,
}

impl PluginHost {
    /// Build a host from configuration around the given router and globals.
    ///
    /// Also returns the backend receiver when diagnostics are forwarded.
    pub fn from_config(
        config: &MetaDeckConfig,
        router: Arc<dyn HostRouter>,
        globals: Arc<dyn HostGlobals>,
    ) -> (Self, Option<mpsc::UnboundedReceiver<String>>) {
        let (diagnostics, backend) = diagnostics_for(&config.diagnostics);
        let host = Self {
            name: config.plugin.name.clone(),
            router,
            globals,
            bundled_runtime: Some(Arc::new(BundledRuntime::new())),
            settings: Arc::new(JsonFileSettings::new(config.settings.resolved_dir())),
            official_source: Arc::new(HttpServerList::new(
                config.provider.official_servers_url.clone(),
            )),
            fetch_timeout: config.provider.fetch_timeout(),
            diagnostics,
        };
        (host, backend)
    }
}

/// A live activation.
pub struct ActivePlugin {
    name: String,
    version: &'static str,
    state: MetaDeckState,
    teardown: Teardown,
    initial_resolution: Mutex<Option<JoinHandle<()>>>,
}

impl ActivePlugin {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        self.version
    }

    pub fn state(&self) -> &MetaDeckState {
        &self.state
    }

    /// Wait until the server option resolution started by activation has
    /// finished. Returns immediately on later calls.
    pub async fn server_options_ready(&self) {
        let handle = self.take_initial_resolution();
        if let Some(handle) = handle
            && let Err(e) = handle.await
            && !e.is_cancelled()
        {
            warn!(error = %e, "initial server option resolution failed");
        }
    }

    fn take_initial_resolution(&self) -> Option<JoinHandle<()>> {
        self.initial_resolution
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Dismount everything this activation mounted. Later calls do nothing.
    ///
    /// An initial resolution still in flight is cancelled.
    pub fn on_dismount(&self) -> usize {
        if let Some(handle) = self.take_initial_resolution() {
            handle.abort();
        }
        let dismounted = self.teardown.run();
        info!(name = %self.name, dismounted, "plugin dismounted");
        dismounted
    }
}

/// Activate against the process-wide store.
pub async fn activate(host: PluginHost) -> Result<ActivePlugin, MetaDeckError> {
    activate_with(host, process_store()).await
}

/// Activate against an explicit store slot.
pub async fn activate_with(
    host: PluginHost,
    store: &StoreBootstrap,
) -> Result<ActivePlugin, MetaDeckError> {
    let chain = LookupChain::standard(host.bundled_runtime.clone());
    let store = store.bootstrap(host.globals.as_ref(), &chain)?;

    let bus = MetaDeckBus::new();
    let mounts = Mounts::new(
        bus.clone(),
        Arc::clone(&host.router),
        Arc::clone(&host.diagnostics),
    );
    let resolver = Arc::new(ProviderServerResolver::with_timeout(
        host.official_source,
        host.fetch_timeout,
    ));
    let igdb = Arc::new(IgdbServerSettings::new(
        Arc::clone(&host.settings),
        resolver,
        bus.clone(),
    ));
    let mut state = MetaDeckState::new(
        bus,
        mounts,
        store.clone(),
        MetadataModules {
            igdb: Arc::clone(&igdb),
        },
    );

    let diagnostics = host.diagnostics.as_ref();
    emit_diag(diagnostics, "boot OK", None);
    emit_diag(
        diagnostics,
        "reactive runtime",
        Some(json!({ "source": store.source().to_string(), "id": store.runtime().id() })),
    );

    if let Err(e) = host.settings.migrate_legacy().await {
        warn!(error = %e, "failed to migrate legacy settings");
    }
    if let Err(e) = igdb.load_settings().await {
        warn!(error = %e, "failed to load settings, using defaults");
    }

    let mounts = state.mounts_mut();
    mounts.add_page_mount(SETTINGS_ROUTE, settings_page(&host.name, Arc::clone(&igdb)))?;
    mounts.add_page_mount(MODULE_ROUTE, module_page())?;

    let teardown = state.mounts().register()?;
    info!(name = %host.name, version = PLUGIN_VERSION, "plugin activated");

    // The official list fetch may take up to the fetch timeout.
    let initial_resolution = tokio::spawn(async move {
        igdb.refresh().await;
    });

    Ok(ActivePlugin {
        name: host.name,
        version: PLUGIN_VERSION,
        state,
        teardown,
        initial_resolution: Mutex::new(Some(initial_resolution)),
    })
}

fn settings_page(title: &str, igdb: Arc<IgdbServerSettings>) -> RenderFn {
    let title = title.to_string();
    Arc::new(move || {
        let labels: Vec<String> = igdb.options().into_iter().map(|o| o.label).collect();
        json!({ "page": "settings", "title": title, "serverOptions": labels })
    })
}

fn module_page() -> RenderFn {
    Arc::new(|| json!({ "page": "module", "modules": ["metadata"] }))
}
