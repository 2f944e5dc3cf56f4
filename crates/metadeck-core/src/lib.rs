// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the MetaDeck plugin.
//!
//! This crate provides the collaborator traits the plugin core is written
//! against (host router, host globals, diagnostics, official server source,
//! settings store), the shared error type, and the common domain types.

pub mod error;
pub mod events;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MetaDeckError;
pub use events::{MetaDeckBus, MetaDeckEvent};
pub use types::{
    ApiServer, EnforceActions, IgdbSettings, PageContent, RenderFn, RouteProps, RoutePatchFn,
    RuntimeConfig, ServerOption, Settings,
};

pub use traits::{
    DiagnosticsSink, HostGlobals, HostRouter, Mountable, OfficialServerSource, ReactiveRuntime,
    SettingsStore,
};
