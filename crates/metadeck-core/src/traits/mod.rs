// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits at the seams between the plugin core and its host.
//!
//! Synchronous traits model host calls that complete immediately; network and
//! persistence collaborators use `#[async_trait]` for dynamic dispatch.

pub mod diagnostics;
pub mod globals;
pub mod mountable;
pub mod provider;
pub mod router;
pub mod settings;

pub use diagnostics::DiagnosticsSink;
pub use globals::{HostGlobals, ReactiveRuntime};
pub use mountable::Mountable;
pub use provider::OfficialServerSource;
pub use router::HostRouter;
pub use settings::SettingsStore;
