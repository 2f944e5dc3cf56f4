// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across MetaDeck crates.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Loosely-typed properties handed to a route patch by the host router.
pub type RouteProps = serde_json::Value;

/// Host-side description of a page's content, produced by a [`RenderFn`].
pub type PageContent = serde_json::Value;

/// Produces the content of a mounted page each time the host renders it.
pub type RenderFn = Arc<dyn Fn() -> PageContent + Send + Sync>;

/// A route-interception patch: receives the route props and returns the
/// (possibly rewritten) props.
///
/// Patches are compared by pointer identity when removed from the host router.
pub type RoutePatchFn = Arc<dyn Fn(RouteProps) -> RouteProps + Send + Sync>;

/// A metadata provider API server. Two servers are the same server when their
/// `url`s match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiServer {
    pub name: String,
    pub url: String,
}

impl ApiServer {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A selectable entry of the API server dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerOption {
    /// Display label, `"{name} ({url})"`.
    pub label: String,
    pub server: ApiServer,
}

impl From<ApiServer> for ServerOption {
    fn from(server: ApiServer) -> Self {
        Self {
            label: format!("{} ({})", server.name, server.url),
            server,
        }
    }
}

/// Whether the reactive runtime enforces that state is only mutated inside
/// actions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum EnforceActions {
    Never,
    Observed,
    Always,
}

/// Options passed to a reactive runtime's `configure` entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub isolate_global_state: bool,
    pub enforce_actions: EnforceActions,
}

impl RuntimeConfig {
    /// Isolated state, no action enforcement.
    pub const PLUGIN: RuntimeConfig = RuntimeConfig {
        isolate_global_state: true,
        enforce_actions: EnforceActions::Never,
    };
}

/// Persisted user settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub igdb: IgdbSettings,
}

/// API server settings for the IGDB metadata provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgdbSettings {
    /// The currently selected server, if any.
    #[serde(default)]
    pub server: Option<ApiServer>,

    /// User-entered servers, in the order they were added.
    #[serde(default)]
    pub custom_servers: Vec<ApiServer>,
}
