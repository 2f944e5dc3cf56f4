// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reactive runtime bootstrap.
//!
//! The plugin shares its observable-state runtime with the host when the host
//! exposes one, and falls back to the bundled runtime otherwise. The chosen
//! runtime is configured once per process with isolated global state and no
//! action enforcement.

pub mod bootstrap;
pub mod bundled;
pub mod lookup;

pub use bootstrap::{
    bootstrap, process_store, store, StoreBootstrap, StoreHandle, CONFIGURED_FLAG,
};
pub use bundled::BundledRuntime;
pub use lookup::{HostSlot, LocalBundle, LookupChain, RuntimeLookup, RuntimeSource};
