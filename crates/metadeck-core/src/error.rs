// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the MetaDeck plugin.

use thiserror::Error;

/// The primary error type used across the MetaDeck crates.
#[derive(Debug, Error)]
pub enum MetaDeckError {
    /// Invalid configuration or invalid arguments to a builder.
    #[error("configuration error: {0}")]
    Config(String),

    /// A mountable resource failed to attach or detach.
    #[error("mount `{resource}` failed: {message}")]
    Mount { resource: String, message: String },

    /// The host router rejected a route or patch operation.
    #[error("router error on `{path}`: {message}")]
    Router { path: String, message: String },

    /// `register()` was called while an earlier registration is still live.
    #[error("mounts are already registered; run the previous teardown first")]
    AlreadyRegistered,

    /// No reactive runtime could be found in the host or the local bundle.
    #[error("reactive runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    /// Metadata provider errors (official list fetch, response parsing).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Settings persistence errors.
    #[error("settings error: {message}")]
    Settings {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}
