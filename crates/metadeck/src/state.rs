// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The plugin's composition root.

use std::sync::Arc;

use metadeck_core::events::MetaDeckBus;
use metadeck_mounts::Mounts;
use metadeck_provider::IgdbServerSettings;
use metadeck_store::StoreHandle;

/// Metadata provider modules.
pub struct MetadataModules {
    pub igdb: Arc<IgdbServerSettings>,
}

/// Owns the bus, the mount registry and the provider modules for one plugin
/// activation. UI code reads and writes through this object and listens on
/// its bus.
pub struct MetaDeckState {
    bus: MetaDeckBus,
    mounts: Mounts,
    store: StoreHandle,
    metadata: MetadataModules,
}

impl MetaDeckState {
    pub fn new(
        bus: MetaDeckBus,
        mounts: Mounts,
        store: StoreHandle,
        metadata: MetadataModules,
    ) -> Self {
        Self {
            bus,
            mounts,
            store,
            metadata,
        }
    }

    pub fn bus(&self) -> &MetaDeckBus {
        &self.bus
    }

    pub fn mounts(&self) -> &Mounts {
        &self.mounts
    }

    pub fn mounts_mut(&mut self) -> &mut Mounts {
        &mut self.mounts
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn metadata(&self) -> &MetadataModules {
        &self.metadata
    }

    pub fn igdb(&self) -> &Arc<IgdbServerSettings> {
        &self.metadata.igdb
    }

    /// Run `update` as one batched action on the reactive runtime.
    pub fn run_in_action<T>(&self, update: impl FnOnce(&Self) -> T) -> T {
        self.store.run_in_action(|| update(self))
    }
}
