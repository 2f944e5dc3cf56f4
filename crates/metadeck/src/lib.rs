// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MetaDeck plugin core.
//!
//! Wires the event bus, the mount registry, the reactive store and the
//! metadata provider modules into one activation.

pub mod diag;
pub mod plugin;
pub mod state;

pub use diag::{diag_line, run_backend_log, ForwardingDiagnostics, TracingDiagnostics};
pub use plugin::{activate, activate_with, ActivePlugin, PluginHost};
pub use state::MetaDeckState;
