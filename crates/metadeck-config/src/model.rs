// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so unrecognized keys are
//! reported at startup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the official API server list is published.
pub const DEFAULT_OFFICIAL_SERVERS_URL: &str =
    "https://raw.githubusercontent.com/EmuDeck/MetaDeck/refs/heads/main/api_servers.json";

/// Top-level MetaDeck configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetaDeckConfig {
    #[serde(default)]
    pub plugin: PluginConfig,

    /// Metadata provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Persisted user settings location.
    #[serde(default)]
    pub settings: SettingsConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Plugin identity and logging.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginConfig {
    /// Display name.
    #[serde(default = "default_plugin_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            name: default_plugin_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_plugin_name() -> String {
    "MetaDeck".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Official API server list source.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default = "default_official_servers_url")]
    pub official_servers_url: String,

    /// Upper bound on the official list fetch, in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            official_servers_url: default_official_servers_url(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

impl ProviderConfig {
    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.fetch_timeout_ms)
    }
}

fn default_official_servers_url() -> String {
    DEFAULT_OFFICIAL_SERVERS_URL.to_string()
}

fn default_fetch_timeout_ms() -> u64 {
    5000
}

/// Settings file location.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    /// Directory holding `settings.json`. Defaults to the XDG data dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl SettingsConfig {
    /// The configured directory, or `<data dir>/metadeck`.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("metadeck")
        })
    }
}

/// Diagnostic line output.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Also forward diagnostic lines to the plugin backend.
    #[serde(default = "default_true")]
    pub forward_to_backend: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            forward_to_backend: true,
        }
    }
}

fn default_true() -> bool {
    true
}
