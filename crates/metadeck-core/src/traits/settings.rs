// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings persistence collaborator.

use async_trait::async_trait;

use crate::error::MetaDeckError;
use crate::types::Settings;

/// Key-value store holding the user's settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn read_settings(&self) -> Result<Settings, MetaDeckError>;

    async fn write_settings(&self, settings: &Settings) -> Result<(), MetaDeckError>;

    /// Move settings left by an older release into place. Returns whether
    /// anything was moved; stores without a legacy format move nothing.
    async fn migrate_legacy(&self) -> Result<bool, MetaDeckError> {
        Ok(false)
    }
}
