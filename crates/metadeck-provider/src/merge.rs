// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merging server lists by URL.

use std::collections::HashSet;

use metadeck_core::types::ApiServer;

/// `official ++ custom ++ selected`, keeping the first server for each URL.
pub fn merge_servers(
    official: &[ApiServer],
    custom: &[ApiServer],
    selected: Option<&ApiServer>,
) -> Vec<ApiServer> {
    let mut seen = HashSet::new();
    official
        .iter()
        .chain(custom)
        .chain(selected)
        .filter(|server| seen.insert(server.url.as_str()))
        .cloned()
        .collect()
}
