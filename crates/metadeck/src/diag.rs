// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic line sinks.
//!
//! A diagnostic line is a short message optionally followed by a JSON
//! payload. Lines are logged locally and may be forwarded to the plugin
//! backend, which writes them to its own log.

use std::sync::Arc;

use metadeck_config::model::DiagnosticsConfig;
use metadeck_core::traits::DiagnosticsSink;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Tracing target of locally logged diagnostic lines.
pub const DIAG_TARGET: &str = "metadeck::diag";
/// Tracing target used by the backend when it logs a forwarded line.
pub const BACKEND_TARGET: &str = "metadeck::backend";

/// `"{message} {payload}"`, or just `message` without a payload.
pub fn diag_line(message: &str, payload: Option<&serde_json::Value>) -> String {
    match payload {
        Some(payload) => format!("{message} {payload}"),
        None => message.to_string(),
    }
}

/// Format and emit one diagnostic line.
pub fn emit_diag(sink: &dyn DiagnosticsSink, message: &str, payload: Option<serde_json::Value>) {
    sink.emit(&diag_line(message, payload.as_ref()));
}

/// Logs each line at WARN.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn emit(&self, line: &str) {
        warn!(target: DIAG_TARGET, "[MetaDeck DIAG] {line}");
    }
}

/// Drops every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledDiagnostics;

impl DiagnosticsSink for DisabledDiagnostics {
    fn emit(&self, _line: &str) {}
}

/// Logs each line locally and forwards it to the backend channel.
///
/// Forwarding is fire-and-forget: a closed channel is ignored.
#[derive(Debug, Clone)]
pub struct ForwardingDiagnostics {
    tx: mpsc::UnboundedSender<String>,
}

impl ForwardingDiagnostics {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl DiagnosticsSink for ForwardingDiagnostics {
    fn emit(&self, line: &str) {
        TracingDiagnostics.emit(line);
        let _ = self.tx.send(line.to_string());
    }
}

/// The sink selected by `[diagnostics]`, plus the backend receiver when
/// forwarding is on.
pub fn diagnostics_for(
    config: &DiagnosticsConfig,
) -> (Arc<dyn DiagnosticsSink>, Option<mpsc::UnboundedReceiver<String>>) {
    match (config.enabled, config.forward_to_backend) {
        (false, _) => (Arc::new(DisabledDiagnostics), None),
        (true, false) => (Arc::new(TracingDiagnostics), None),
        (true, true) => {
            let (sink, rx) = ForwardingDiagnostics::new();
            (Arc::new(sink), Some(rx))
        }
    }
}

/// Backend side of forwarding: log every received line until all senders
/// are gone. Returns the number of lines logged.
pub async fn run_backend_log(mut rx: mpsc::UnboundedReceiver<String>) -> usize {
    let mut count = 0;
    while let Some(line) = rx.recv().await {
        info!(target: BACKEND_TARGET, "[MetaDeck DIAG] {line}");
        count += 1;
    }
    count
}
