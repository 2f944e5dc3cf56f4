// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! API server configuration for metadata providers.
//!
//! The selectable server list merges the official list (fetched over HTTP
//! under a timeout), the user's custom servers and the current selection,
//! keeping the first entry for each URL. A failed or slow fetch degrades to
//! an empty official list; resolution itself never fails.

pub mod igdb;
pub mod merge;
pub mod official;
pub mod resolver;
pub mod watcher;

pub use igdb::IgdbServerSettings;
pub use merge::merge_servers;
pub use official::{parse_server_map, HttpServerList, OFFICIAL_API_SERVERS_URL};
pub use resolver::{
    OfficialStatus, ProviderServerResolver, Resolution, ResolverState, OFFICIAL_FETCH_TIMEOUT,
};
pub use watcher::ServerOptionsWatcher;
