// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route patches wrapped with hit diagnostics.
//!
//! [`route_patch`] builds the wrapper closure once, so the exact `Arc` that
//! `mount` hands to the host router is the one `dismount` removes.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use metadeck_core::traits::{DiagnosticsSink, HostRouter, Mountable};
use metadeck_core::types::{RouteProps, RoutePatchFn};
use metadeck_core::MetaDeckError;

/// Property paths checked for the app id, in order.
const APP_ID_POINTERS: [&str; 2] = ["/match/params/appid", "/params/appid"];

/// Best-effort app identifier read from route props.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppIdentifier {
    Known(String),
    Unknown,
}

impl AppIdentifier {
    /// Read the app id from `props`, trying `match.params.appid` then
    /// `params.appid`. Strings and numbers are accepted.
    pub fn from_props(props: &RouteProps) -> Self {
        APP_ID_POINTERS
            .iter()
            .filter_map(|pointer| props.pointer(pointer))
            .find_map(|value| match value {
                serde_json::Value::String(s) => Some(AppIdentifier::Known(s.clone())),
                serde_json::Value::Number(n) => Some(AppIdentifier::Known(n.to_string())),
                _ => None,
            })
            .unwrap_or(AppIdentifier::Unknown)
    }
}

impl fmt::Display for AppIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppIdentifier::Known(id) => f.write_str(id),
            AppIdentifier::Unknown => f.write_str("unknown"),
        }
    }
}

/// A patch installed into the host router's patch chain for one path.
pub struct RoutePatchMount {
    name: String,
    path: String,
    wrapper: RoutePatchFn,
    router: Arc<dyn HostRouter>,
}

impl RoutePatchMount {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The closure handed to the host router.
    pub fn wrapper(&self) -> &RoutePatchFn {
        &self.wrapper
    }
}

impl Mountable for RoutePatchMount {
    fn name(&self) -> &str {
        &self.name
    }

    fn mount(&self) -> Result<(), MetaDeckError> {
        self.router.add_patch(&self.path, Arc::clone(&self.wrapper))
    }

    fn dismount(&self) -> Result<(), MetaDeckError> {
        self.router.remove_patch(&self.path, &self.wrapper)
    }
}

/// Wrap `patch` so every route hit emits a diagnostic line before the patch
/// runs. Nothing about the diagnostic step can stop the patch from running.
pub fn route_patch(
    path: &str,
    patch: RoutePatchFn,
    router: Arc<dyn HostRouter>,
    diagnostics: Arc<dyn DiagnosticsSink>,
) -> Result<RoutePatchMount, MetaDeckError> {
    if path.trim().is_empty() {
        return Err(MetaDeckError::Config(
            "route patch path must not be empty".to_string(),
        ));
    }

    let hit_path = path.to_string();
    let wrapper: RoutePatchFn = Arc::new(move |props: RouteProps| {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let app_id = AppIdentifier::from_props(&props);
            diagnostics.emit(&format!("routePatch hit {hit_path} appid={app_id}"));
        }));
        patch(props)
    });

    Ok(RoutePatchMount {
        name: format!("patch {path}"),
        path: path.to_string(),
        wrapper,
        router,
    })
}
