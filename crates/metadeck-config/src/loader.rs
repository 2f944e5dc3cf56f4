// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `/etc/metadeck/metadeck.toml`, then
//! `~/.config/metadeck/metadeck.toml`, then `./metadeck.toml`, with
//! `METADECK_*` environment variables applied last.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use tracing::debug;

use crate::model::MetaDeckConfig;

const SYSTEM_CONFIG: &str = "/etc/metadeck/metadeck.toml";
const LOCAL_CONFIG: &str = "metadeck.toml";

/// Config files in merge order. Missing files are skipped by Figment.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("metadeck").join(LOCAL_CONFIG));
    }
    paths.push(PathBuf::from(LOCAL_CONFIG));
    paths
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<MetaDeckConfig, figment::Error> {
    let config: MetaDeckConfig = build_figment().extract()?;
    debug!(name = %config.plugin.name, "configuration loaded");
    Ok(config)
}

/// Load configuration from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<MetaDeckConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MetaDeckConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MetaDeckConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MetaDeckConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full Figment before extraction.
pub fn build_figment() -> Figment {
    config_paths().into_iter().fold(
        Figment::new().merge(Serialized::defaults(MetaDeckConfig::default())),
        |figment, path| figment.merge(Toml::file(path)),
    )
    .merge(env_provider())
}

/// `METADECK_<SECTION>_<KEY>` maps to `<section>.<key>`.
///
/// Uses an explicit section map rather than `Env::split("_")` so keys that
/// contain underscores stay intact: `METADECK_PROVIDER_FETCH_TIMEOUT_MS` is
/// `provider.fetch_timeout_ms`.
fn env_provider() -> Env {
    Env::prefixed("METADECK_").map(|key| {
        key.as_str()
            .to_ascii_lowercase()
            .replacen("plugin_", "plugin.", 1)
            .replacen("provider_", "provider.", 1)
            .replacen("settings_", "settings.", 1)
            .replacen("diagnostics_", "diagnostics.", 1)
            .into()
    })
}
