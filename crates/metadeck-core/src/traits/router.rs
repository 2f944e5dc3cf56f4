// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host router collaborator.

use crate::error::MetaDeckError;
use crate::types::{RenderFn, RoutePatchFn};

/// The host application's page router and route-interception chain.
pub trait HostRouter: Send + Sync {
    /// Register `render` as the content for the `path` pattern.
    fn add_route(&self, path: &str, render: RenderFn) -> Result<(), MetaDeckError>;

    /// Remove the content registered for `path`.
    fn remove_route(&self, path: &str) -> Result<(), MetaDeckError>;

    /// Append `patch` to the patch chain of `path`.
    fn add_patch(&self, path: &str, patch: RoutePatchFn) -> Result<(), MetaDeckError>;

    /// Remove the patch that is pointer-identical to `patch` from `path`.
    fn remove_patch(&self, path: &str, patch: &RoutePatchFn) -> Result<(), MetaDeckError>;
}
