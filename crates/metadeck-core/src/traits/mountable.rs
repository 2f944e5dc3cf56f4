// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resources with symmetric attach/detach operations.

use crate::error::MetaDeckError;

/// A resource that can be attached to and detached from the host.
///
/// Creating a mountable has no side effects; `mount` performs them and
/// `dismount` reverses all of them. The owning registry calls each at most once
/// per registration.
pub trait Mountable: Send + Sync {
    /// Human-readable resource name used in logs and events.
    fn name(&self) -> &str;

    fn mount(&self) -> Result<(), MetaDeckError>;

    fn dismount(&self) -> Result<(), MetaDeckError>;
}
