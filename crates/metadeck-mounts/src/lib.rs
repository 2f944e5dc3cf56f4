// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mountable resource registry for the host router.
//!
//! [`Mounts`] owns page mounts and route patches and attaches them to the host
//! in one `register()` pass. The returned [`Teardown`] detaches them again in
//! reverse order, exactly once.

pub mod page;
pub mod registry;
pub mod route_patch;

pub use page::PageMount;
pub use registry::{Mounts, Teardown};
pub use route_patch::{route_patch, AppIdentifier, RoutePatchMount};
