// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source of the official API server list.

use async_trait::async_trait;

use crate::error::MetaDeckError;
use crate::types::ApiServer;

/// Fetches the official list of metadata provider API servers.
#[async_trait]
pub trait OfficialServerSource: Send + Sync {
    /// Fetch and parse the list, preserving the source's order.
    async fn fetch_official(&self) -> Result<Vec<ApiServer>, MetaDeckError>;
}
