// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events published on the plugin's [`EventBus`](metadeck_bus::EventBus).

use metadeck_bus::BusEvent;

/// The bus used throughout the plugin.
pub type MetaDeckBus = metadeck_bus::EventBus<MetaDeckEvent>;

pub const MOUNTED: &str = "mounted";
pub const MOUNT_FAILED: &str = "mount_failed";
pub const DISMOUNTED: &str = "dismounted";
pub const SETTINGS_CHANGED: &str = "settings_changed";
pub const SERVER_OPTIONS_RESOLVED: &str = "server_options_resolved";

/// Lifecycle and state-change notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaDeckEvent {
    /// A mountable resource attached to the host.
    Mounted { resource: String },
    /// A mountable resource failed to attach.
    MountFailed { resource: String, error: String },
    /// A mountable resource detached from the host.
    Dismounted { resource: String },
    /// Persisted settings changed.
    SettingsChanged,
    /// A fresh API server option list is available.
    ServerOptionsResolved {
        options: usize,
        official_available: bool,
    },
}

impl BusEvent for MetaDeckEvent {
    fn name(&self) -> &'static str {
        match self {
            MetaDeckEvent::Mounted { .. } => MOUNTED,
            MetaDeckEvent::MountFailed { .. } => MOUNT_FAILED,
            MetaDeckEvent::Dismounted { .. } => DISMOUNTED,
            MetaDeckEvent::SettingsChanged => SETTINGS_CHANGED,
            MetaDeckEvent::ServerOptionsResolved { .. } => SERVER_OPTIONS_RESOLVED,
        }
    }
}
