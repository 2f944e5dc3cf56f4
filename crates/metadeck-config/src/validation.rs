// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::MetaDeckConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MAX_FETCH_TIMEOUT_MS: u64 = 60_000;

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &MetaDeckConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.plugin.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "plugin.name must not be empty".to_string(),
        });
    }

    let level = config.plugin.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "plugin.log_level `{}` is not one of {}",
                config.plugin.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let url = config.provider.official_servers_url.trim();
    let has_host = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        errors.push(ConfigError::Validation {
            message: format!(
                "provider.official_servers_url `{url}` must be an http(s) URL"
            ),
        });
    }

    let timeout = config.provider.fetch_timeout_ms;
    if timeout == 0 || timeout > MAX_FETCH_TIMEOUT_MS {
        errors.push(ConfigError::Validation {
            message: format!(
                "provider.fetch_timeout_ms must be between 1 and {MAX_FETCH_TIMEOUT_MS}, got {timeout}"
            ),
        });
    }

    if let Some(dir) = &config.settings.dir
        && dir.as_os_str().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "settings.dir must not be empty when set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
