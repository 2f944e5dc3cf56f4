// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Side-channel for diagnostic lines.

/// Receives free-text diagnostic lines.
///
/// Implementations must never panic or block; any failure to deliver a line
/// is dropped silently.
pub trait DiagnosticsSink: Send + Sync {
    fn emit(&self, line: &str);
}
