// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered lookup chain for the reactive runtime.

use std::sync::Arc;

use metadeck_core::traits::{HostGlobals, ReactiveRuntime};

/// Where the resolved runtime came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum RuntimeSource {
    /// A top-level host global slot.
    HostGlobal,
    /// A slot nested inside a host global namespace.
    HostNamespace,
    /// The runtime bundled with the plugin.
    Local,
}

/// One way of finding a runtime.
pub trait RuntimeLookup: Send + Sync {
    fn source(&self) -> RuntimeSource;

    fn lookup(&self, host: &dyn HostGlobals) -> Option<Arc<dyn ReactiveRuntime>>;
}

/// Looks a runtime up at a fixed host global path.
pub struct HostSlot {
    path: Vec<&'static str>,
}

impl HostSlot {
    pub fn new(path: &[&'static str]) -> Self {
        Self {
            path: path.to_vec(),
        }
    }
}

impl RuntimeLookup for HostSlot {
    fn source(&self) -> RuntimeSource {
        if self.path.len() > 1 {
            RuntimeSource::HostNamespace
        } else {
            RuntimeSource::HostGlobal
        }
    }

    fn lookup(&self, host: &dyn HostGlobals) -> Option<Arc<dyn ReactiveRuntime>> {
        host.runtime_at(&self.path)
    }
}

/// The runtime shipped with the plugin, if it was built with one.
pub struct LocalBundle(Option<Arc<dyn ReactiveRuntime>>);

impl LocalBundle {
    pub fn new(runtime: Option<Arc<dyn ReactiveRuntime>>) -> Self {
        Self(runtime)
    }
}

impl RuntimeLookup for LocalBundle {
    fn source(&self) -> RuntimeSource {
        RuntimeSource::Local
    }

    fn lookup(&self, _host: &dyn HostGlobals) -> Option<Arc<dyn ReactiveRuntime>> {
        self.0.clone()
    }
}

/// Lookup strategies tried in order until one yields a runtime.
pub struct LookupChain {
    strategies: Vec<Box<dyn RuntimeLookup>>,
}

impl LookupChain {
    pub fn new(strategies: Vec<Box<dyn RuntimeLookup>>) -> Self {
        Self { strategies }
    }

    /// `mobx`, then `DFL.mobx`, then the local bundle.
    pub fn standard(bundled: Option<Arc<dyn ReactiveRuntime>>) -> Self {
        Self::new(vec![
            Box::new(HostSlot::new(&["mobx"])),
            Box::new(HostSlot::new(&["DFL", "mobx"])),
            Box::new(LocalBundle::new(bundled)),
        ])
    }

    /// The first runtime found, with the source that produced it.
    pub fn resolve(
        &self,
        host: &dyn HostGlobals,
    ) -> Option<(Arc<dyn ReactiveRuntime>, RuntimeSource)> {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.lookup(host).map(|rt| (rt, strategy.source())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metadeck_test_utils::{CountingRuntime, FakeHostGlobals};

    #[test]
    fn host_global_wins_over_namespace_and_bundle() {
        let host = FakeHostGlobals::new()
            .with_runtime("mobx", CountingRuntime::new("host"))
            .with_runtime("DFL.mobx", CountingRuntime::new("namespaced"));
        let chain = LookupChain::standard(Some(CountingRuntime::new("bundled")));

        let (runtime, source) = chain.resolve(&host).unwrap();
        assert_eq!(runtime.id(), "host");
        assert_eq!(source, RuntimeSource::HostGlobal);
    }

    #[test]
    fn namespace_is_second_choice() {
        let host = FakeHostGlobals::new()
            .with_runtime("DFL.mobx", CountingRuntime::new("namespaced"));
        let chain = LookupChain::standard(Some(CountingRuntime::new("bundled")));

        let (runtime, source) = chain.resolve(&host).unwrap();
        assert_eq!(runtime.id(), "namespaced");
        assert_eq!(source, RuntimeSource::HostNamespace);
    }

    #[test]
    fn bundle_is_the_fallback() {
        let host = FakeHostGlobals::new();
        let chain = LookupChain::standard(Some(CountingRuntime::new("bundled")));

        let (runtime, source) = chain.resolve(&host).unwrap();
        assert_eq!(runtime.id(), "bundled");
        assert_eq!(source, RuntimeSource::Local);
        assert_eq!(source.to_string(), "local");
    }

    #[test]
    fn empty_chain_resolves_nothing() {
        let host = FakeHostGlobals::new();
        assert!(LookupChain::standard(None).resolve(&host).is_none());
    }
}
