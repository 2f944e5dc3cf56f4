// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page content mounted at a host route.

use std::sync::Arc;

use metadeck_core::traits::{HostRouter, Mountable};
use metadeck_core::types::RenderFn;
use metadeck_core::MetaDeckError;

/// Registers a render function as the content of a route pattern.
pub struct PageMount {
    name: String,
    path: String,
    render: RenderFn,
    router: Arc<dyn HostRouter>,
}

impl PageMount {
    /// Build a page mount. `path` must be a non-empty route pattern.
    pub fn new(
        path: &str,
        render: RenderFn,
        router: Arc<dyn HostRouter>,
    ) -> Result<Self, MetaDeckError> {
        if path.trim().is_empty() {
            return Err(MetaDeckError::Config(
                "page mount route path must not be empty".to_string(),
            ));
        }
        Ok(Self {
            name: format!("page {path}"),
            path: path.to_string(),
            render,
            router,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Mountable for PageMount {
    fn name(&self) -> &str {
        &self.name
    }

    fn mount(&self) -> Result<(), MetaDeckError> {
        self.router.add_route(&self.path, Arc::clone(&self.render))
    }

    fn dismount(&self) -> Result<(), MetaDeckError> {
        self.router.remove_route(&self.path)
    }
}
