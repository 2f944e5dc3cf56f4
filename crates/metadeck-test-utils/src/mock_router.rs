// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory host router.
//!
//! `MockRouter` keeps page routes and patch chains in maps, so tests can
//! render pages, run patch chains, and count what a mountable left behind.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use metadeck_core::traits::router::HostRouter;
use metadeck_core::types::{PageContent, RenderFn, RouteProps, RoutePatchFn};
use metadeck_core::MetaDeckError;

/// A host router that records every call.
#[derive(Default)]
pub struct MockRouter {
    routes: Mutex<HashMap<String, RenderFn>>,
    patches: Mutex<HashMap<String, Vec<RoutePatchFn>>>,
    calls: Mutex<Vec<String>>,
    failing_paths: Mutex<HashSet<String>>,
}

impl MockRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every add/remove call on `path` fail.
    pub fn fail_on(&self, path: &str) {
        self.failing_paths.lock().unwrap().insert(path.to_string());
    }

    fn check(&self, op: &str, path: &str) -> Result<(), MetaDeckError> {
        self.calls.lock().unwrap().push(format!("{op} {path}"));
        if self.failing_paths.lock().unwrap().contains(path) {
            return Err(MetaDeckError::Router {
                path: path.to_string(),
                message: format!("{op} rejected"),
            });
        }
        Ok(())
    }

    /// Calls received so far, formatted as `"<op> <path>"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn has_route(&self, path: &str) -> bool {
        self.routes.lock().unwrap().contains_key(path)
    }

    /// Render the page registered for `path`.
    pub fn render(&self, path: &str) -> Option<PageContent> {
        let render = self.routes.lock().unwrap().get(path).cloned();
        render.map(|render| render())
    }

    pub fn patch_count(&self, path: &str) -> usize {
        self.patches.lock().unwrap().get(path).map_or(0, Vec::len)
    }

    /// Run the patch chain for `path` over `props`, in installation order.
    pub fn apply_patches(&self, path: &str, props: RouteProps) -> RouteProps {
        let chain = self
            .patches
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_default();
        chain.iter().fold(props, |props, patch| patch(props))
    }
}

impl HostRouter for MockRouter {
    fn add_route(&self, path: &str, render: RenderFn) -> Result<(), MetaDeckError> {
        self.check("add_route", path)?;
        self.routes.lock().unwrap().insert(path.to_string(), render);
        Ok(())
    }

    fn remove_route(&self, path: &str) -> Result<(), MetaDeckError> {
        self.check("remove_route", path)?;
        self.routes.lock().unwrap().remove(path);
        Ok(())
    }

    fn add_patch(&self, path: &str, patch: RoutePatchFn) -> Result<(), MetaDeckError> {
        self.check("add_patch", path)?;
        self.patches
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push(patch);
        Ok(())
    }

    fn remove_patch(&self, path: &str, patch: &RoutePatchFn) -> Result<(), MetaDeckError> {
        self.check("remove_patch", path)?;
        if let Some(chain) = self.patches.lock().unwrap().get_mut(path) {
            chain.retain(|existing| !Arc::ptr_eq(existing, patch));
        }
        Ok(())
    }
}
