// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! API server settings of the IGDB metadata provider.
//!
//! Holds the selected server and the user's custom servers. Every mutation is
//! persisted, announced with [`MetaDeckEvent::SettingsChanged`] and followed by
//! a fresh server option resolution.

use std::sync::Arc;

use metadeck_core::events::{MetaDeckBus, MetaDeckEvent};
use metadeck_core::traits::SettingsStore;
use metadeck_core::types::{ApiServer, ServerOption, Settings};
use metadeck_core::MetaDeckError;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::resolver::ProviderServerResolver;
use crate::watcher::ServerOptionsWatcher;

pub struct IgdbServerSettings {
    store: Arc<dyn SettingsStore>,
    bus: MetaDeckBus,
    watcher: ServerOptionsWatcher,
    settings: Mutex<Settings>,
}

impl IgdbServerSettings {
    pub fn new(
        store: Arc<dyn SettingsStore>,
        resolver: Arc<ProviderServerResolver>,
        bus: MetaDeckBus,
    ) -> Self {
        Self {
            store,
            watcher: ServerOptionsWatcher::new(resolver, bus.clone()),
            bus,
            settings: Mutex::new(Settings::default()),
        }
    }

    /// Read the persisted settings and resolve the initial option list.
    pub async fn load(&self) -> Result<Vec<ServerOption>, MetaDeckError> {
        self.load_settings().await?;
        Ok(self.refresh().await)
    }

    /// Read the persisted settings without resolving server options.
    pub async fn load_settings(&self) -> Result<(), MetaDeckError> {
        let loaded = self.store.read_settings().await?;
        debug!(
            selected = ?loaded.igdb.server.as_ref().map(|s| &s.url),
            custom = loaded.igdb.custom_servers.len(),
            "IGDB server settings loaded"
        );
        *self.settings.lock().await = loaded;
        Ok(())
    }

    /// Resolve the option list for the current settings, fetching the
    /// official list again.
    pub async fn refresh(&self) -> Vec<ServerOption> {
        let (custom, selected) = {
            let settings = self.settings.lock().await;
            (
                settings.igdb.custom_servers.clone(),
                settings.igdb.server.clone(),
            )
        };
        self.watcher.refresh(&custom, selected.as_ref()).await;
        self.watcher.options()
    }

    pub async fn server(&self) -> Option<ApiServer> {
        self.settings.lock().await.igdb.server.clone()
    }

    pub async fn custom_servers(&self) -> Vec<ApiServer> {
        self.settings.lock().await.igdb.custom_servers.clone()
    }

    /// Options from the latest completed resolution.
    pub fn options(&self) -> Vec<ServerOption> {
        self.watcher.options()
    }

    /// Select `server`, or clear the selection with `None`.
    pub async fn select(
        &self,
        server: Option<ApiServer>,
    ) -> Result<Vec<ServerOption>, MetaDeckError> {
        info!(url = ?server.as_ref().map(|s| &s.url), "selecting IGDB API server");
        self.mutate(|settings| settings.igdb.server = server).await
    }

    /// Append a custom server. Duplicated URLs are kept; the merged option
    /// list shows each URL once.
    pub async fn add_custom(
        &self,
        name: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<Vec<ServerOption>, MetaDeckError> {
        let server = ApiServer::new(name, url);
        info!(name = %server.name, url = %server.url, "adding custom IGDB API server");
        self.mutate(|settings| settings.igdb.custom_servers.push(server))
            .await
    }

    /// Remove every custom server with `url`. Clears the selection when it
    /// pointed at a removed server.
    pub async fn remove_custom(&self, url: &str) -> Result<Vec<ServerOption>, MetaDeckError> {
        info!(url, "removing custom IGDB API server");
        self.mutate(|settings| {
            let igdb = &mut settings.igdb;
            let removed = igdb.custom_servers.iter().any(|s| s.url == url);
            igdb.custom_servers.retain(|s| s.url != url);
            if removed && igdb.server.as_ref().is_some_and(|s| s.url == url) {
                igdb.server = None;
            }
        })
        .await
    }

    async fn mutate(
        &self,
        change: impl FnOnce(&mut Settings),
    ) -> Result<Vec<ServerOption>, MetaDeckError> {
        let (custom, selected) = {
            let mut guard = self.settings.lock().await;
            let mut next = guard.clone();
            change(&mut next);
            self.store.write_settings(&next).await?;
            let inputs = (next.igdb.custom_servers.clone(), next.igdb.server.clone());
            *guard = next;
            inputs
        };

        self.bus.emit(&MetaDeckEvent::SettingsChanged);
        self.watcher.update(&custom, selected.as_ref()).await;
        Ok(self.watcher.options())
    }
}
