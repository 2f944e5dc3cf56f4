// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP source for the official API server list.
//!
//! The list is a JSON object mapping display name to URL. Entries keep the
//! order they have in the document.

use async_trait::async_trait;
use metadeck_core::traits::OfficialServerSource;
use metadeck_core::types::ApiServer;
use metadeck_core::MetaDeckError;
use tracing::debug;

/// Where the official list is published.
pub const OFFICIAL_API_SERVERS_URL: &str =
    "https://raw.githubusercontent.com/EmuDeck/MetaDeck/refs/heads/main/api_servers.json";

/// Fetches the official list with a GET request.
#[derive(Debug, Clone)]
pub struct HttpServerList {
    client: reqwest::Client,
    url: String,
}

impl HttpServerList {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpServerList {
    fn default() -> Self {
        Self::new(OFFICIAL_API_SERVERS_URL)
    }
}

#[async_trait]
impl OfficialServerSource for HttpServerList {
    async fn fetch_official(&self) -> Result<Vec<ApiServer>, MetaDeckError> {
        debug!(url = %self.url, "fetching official API server list");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| MetaDeckError::Provider {
                message: format!("official server list request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let body: serde_json::Value = response.json().await.map_err(|e| MetaDeckError::Provider {
            message: format!("official server list is not valid JSON: {e}"),
            source: Some(Box::new(e)),
        })?;

        parse_server_map(body)
    }
}

/// Convert a `{"name": "url", ...}` document into servers, in document order.
pub fn parse_server_map(body: serde_json::Value) -> Result<Vec<ApiServer>, MetaDeckError> {
    let serde_json::Value::Object(map) = body else {
        return Err(MetaDeckError::Provider {
            message: "official server list must be a JSON object".to_string(),
            source: None,
        });
    };

    map.into_iter()
        .map(|(name, url)| match url {
            serde_json::Value::String(url) => Ok(ApiServer { name, url }),
            other => Err(MetaDeckError::Provider {
                message: format!("official server `{name}` has a non-string url: {other}"),
                source: None,
            }),
        })
        .collect()
}
