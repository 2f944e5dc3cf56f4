// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User settings persisted as JSON files in the plugin settings directory.
//!
//! `settings.json` holds [`Settings`]; `cache.json` holds free-form cached
//! data. A file that is missing or cannot be parsed reads as empty.
//! Writes create the directory and pretty-print with tab indentation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use metadeck_core::traits::SettingsStore;
use metadeck_core::types::Settings;
use metadeck_core::MetaDeckError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

pub const SETTINGS_FILE: &str = "settings.json";
pub const CACHE_FILE: &str = "cache.json";
/// Name of the settings file written by older releases.
pub const LEGACY_SETTINGS_FILE: &str = "metadeck.json";

/// JSON file backed [`SettingsStore`].
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    dir: PathBuf,
}

impl JsonFileSettings {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    /// Cached data, or an empty object.
    pub async fn read_cache(&self) -> serde_json::Value {
        read_json(&self.dir.join(CACHE_FILE))
            .await
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()))
    }

    pub async fn write_cache(&self, cache: &serde_json::Value) -> Result<(), MetaDeckError> {
        self.write_json(CACHE_FILE, cache).await
    }

    async fn write_json<T: Serialize + ?Sized>(
        &self,
        file: &str,
        value: &T,
    ) -> Result<(), MetaDeckError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error("failed to create settings directory", e))?;

        let body = to_tab_indented(value)?;
        let path = self.dir.join(file);
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| io_error("failed to write settings file", e))?;
        debug!(path = %path.display(), "wrote settings file");
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettings {
    async fn read_settings(&self) -> Result<Settings, MetaDeckError> {
        Ok(read_json(&self.settings_path()).await.unwrap_or_default())
    }

    async fn write_settings(&self, settings: &Settings) -> Result<(), MetaDeckError> {
        self.write_json(SETTINGS_FILE, settings).await
    }

    /// Rename a legacy `metadeck.json` to `settings.json`.
    ///
    /// Does nothing when there is no legacy file or `settings.json` already
    /// exists. Returns whether a file was moved.
    async fn migrate_legacy(&self) -> Result<bool, MetaDeckError> {
        let legacy = self.dir.join(LEGACY_SETTINGS_FILE);
        let current = self.settings_path();
        if !exists(&legacy).await || exists(&current).await {
            return Ok(false);
        }
        tokio::fs::rename(&legacy, &current)
            .await
            .map_err(|e| io_error("failed to migrate legacy settings", e))?;
        info!(from = %legacy.display(), to = %current.display(), "migrated legacy settings file");
        Ok(true)
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// `None` when the file is missing or does not parse as `T`.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "settings file unreadable, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "settings file is corrupt, using defaults");
            None
        }
    }
}

fn to_tab_indented<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, MetaDeckError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| MetaDeckError::Settings {
            message: format!("failed to serialize settings: {e}"),
            source: Some(Box::new(e)),
        })?;
    Ok(buf)
}

fn io_error(context: &str, e: std::io::Error) -> MetaDeckError {
    MetaDeckError::Settings {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}
