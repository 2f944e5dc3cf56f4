// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of mountable resources.
//!
//! `Mounts` stores mountables in registration order. `register()` mounts them
//! first to last and hands back a [`Teardown`] that dismounts the ones that
//! mounted, last to first. A failure in one resource is logged and published
//! but never stops its siblings.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use metadeck_core::events::{MetaDeckBus, MetaDeckEvent};
use metadeck_core::traits::{DiagnosticsSink, HostRouter, Mountable};
use metadeck_core::types::{RenderFn, RoutePatchFn};
use metadeck_core::MetaDeckError;
use tracing::{debug, info, warn};

use crate::page::PageMount;
use crate::route_patch::route_patch;

/// Resources mounted by the live registration, tagged with its generation.
struct Live {
    generation: u64,
    mounted: Vec<Arc<dyn Mountable>>,
}

#[derive(Default)]
struct LiveSlot {
    next_generation: u64,
    live: Option<Live>,
}

type SharedSlot = Arc<Mutex<LiveSlot>>;

fn lock(slot: &SharedSlot) -> MutexGuard<'_, LiveSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run one lifecycle call, turning a panic into an error.
fn guarded(
    resource: &str,
    call: impl FnOnce() -> Result<(), MetaDeckError>,
) -> Result<(), MetaDeckError> {
    catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|payload| {
        Err(MetaDeckError::Mount {
            resource: resource.to_string(),
            message: format!("panicked: {}", panic_message(payload.as_ref())),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Owns the plugin's page mounts and route patches.
pub struct Mounts {
    bus: MetaDeckBus,
    router: Arc<dyn HostRouter>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    mountables: Vec<Arc<dyn Mountable>>,
    slot: SharedSlot,
}

impl Mounts {
    /// Create an empty registry attached to `router`.
    pub fn new(
        bus: MetaDeckBus,
        router: Arc<dyn HostRouter>,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        Self {
            bus,
            router,
            diagnostics,
            mountables: Vec::new(),
            slot: SharedSlot::default(),
        }
    }

    /// Own an arbitrary mountable.
    pub fn add(&mut self, mountable: Arc<dyn Mountable>) {
        debug!(resource = mountable.name(), "mountable added");
        self.mountables.push(mountable);
    }

    /// Own a page whose content is produced by `render` at `route_path`.
    ///
    /// The registry does not check for duplicate paths.
    pub fn add_page_mount(
        &mut self,
        route_path: &str,
        render: RenderFn,
    ) -> Result<(), MetaDeckError> {
        let page = PageMount::new(route_path, render, Arc::clone(&self.router))?;
        self.add(Arc::new(page));
        Ok(())
    }

    /// Own a diagnostic-wrapped route patch for `path`.
    pub fn add_route_patch(
        &mut self,
        path: &str,
        patch: RoutePatchFn,
    ) -> Result<(), MetaDeckError> {
        let mount = route_patch(
            path,
            patch,
            Arc::clone(&self.router),
            Arc::clone(&self.diagnostics),
        )?;
        self.add(Arc::new(mount));
        Ok(())
    }

    /// Mount every owned resource in registration order.
    ///
    /// Fails with [`MetaDeckError::AlreadyRegistered`] while the teardown of a
    /// previous registration has not run.
    pub fn register(&self) -> Result<Teardown, MetaDeckError> {
        let generation = {
            let mut slot = lock(&self.slot);
            if slot.live.is_some() {
                return Err(MetaDeckError::AlreadyRegistered);
            }
            let generation = slot.next_generation;
            slot.next_generation += 1;
            // Reserve the slot before mounting so a concurrent register() fails.
            slot.live = Some(Live {
                generation,
                mounted: Vec::new(),
            });
            generation
        };

        let mut mounted = Vec::with_capacity(self.mountables.len());
        for mountable in &self.mountables {
            let resource = mountable.name().to_string();
            match guarded(&resource, || mountable.mount()) {
                Ok(()) => {
                    debug!(resource = %resource, "mounted");
                    mounted.push(Arc::clone(mountable));
                    self.bus.emit(&MetaDeckEvent::Mounted { resource });
                }
                Err(e) => {
                    warn!(resource = %resource, error = %e, "mount failed, continuing");
                    self.bus.emit(&MetaDeckEvent::MountFailed {
                        resource,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            mounted = mounted.len(),
            total = self.mountables.len(),
            "mounts registered"
        );

        if let Some(live) = lock(&self.slot).live.as_mut() {
            live.mounted = mounted;
        }

        Ok(Teardown {
            generation,
            slot: Arc::clone(&self.slot),
            bus: self.bus.clone(),
        })
    }

    /// Whether a registration is live.
    pub fn is_registered(&self) -> bool {
        lock(&self.slot).live.is_some()
    }

    /// Number of owned resources.
    pub fn len(&self) -> usize {
        self.mountables.len()
    }

    /// Returns true if no resources are owned.
    pub fn is_empty(&self) -> bool {
        self.mountables.is_empty()
    }
}

/// Detaches the resources mounted by one `register()` call.
#[must_use = "dropping the teardown leaves every resource mounted"]
pub struct Teardown {
    generation: u64,
    slot: SharedSlot,
    bus: MetaDeckBus,
}

impl Teardown {
    /// Dismount the registration's resources in reverse order.
    ///
    /// Returns how many resources were dismounted successfully. Only the
    /// first call does anything.
    pub fn run(&self) -> usize {
        let mounted = {
            let mut slot = lock(&self.slot);
            match slot.live.as_ref() {
                Some(live) if live.generation == self.generation => {
                    slot.live.take().map(|live| live.mounted).unwrap_or_default()
                }
                _ => return 0,
            }
        };

        let mut dismounted = 0;
        for mountable in mounted.iter().rev() {
            let resource = mountable.name().to_string();
            match guarded(&resource, || mountable.dismount()) {
                Ok(()) => {
                    dismounted += 1;
                    debug!(resource = %resource, "dismounted");
                    self.bus.emit(&MetaDeckEvent::Dismounted { resource });
                }
                Err(e) => {
                    warn!(resource = %resource, error = %e, "dismount failed, continuing");
                }
            }
        }

        info!(dismounted, total = mounted.len(), "mounts torn down");
        dismounted
    }
}

impl std::fmt::Debug for Teardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Teardown")
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metadeck_core::events::{DISMOUNTED, MOUNT_FAILED, MOUNTED};
    use metadeck_test_utils::{MockRouter, MountLog, RecordingMountable, RecordingDiagnostics};
    use tracing_test::traced_test;

    fn registry() -> (Mounts, Arc<MockRouter>, MetaDeckBus) {
        let bus = MetaDeckBus::new();
        let router = Arc::new(MockRouter::new());
        let mounts = Mounts::new(
            bus.clone(),
            router.clone(),
            Arc::new(RecordingDiagnostics::new()),
        );
        (mounts, router, bus)
    }

    fn recorded(mounts: &mut Mounts, names: &[&str]) -> MountLog {
        let log = MountLog::default();
        for name in names {
            mounts.add(Arc::new(RecordingMountable::new(*name, &log)));
        }
        log
    }

    fn entries(log: &MountLog) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn register_mounts_in_order_and_teardown_reverses() {
        let (mut mounts, _router, _bus) = registry();
        let log = recorded(&mut mounts, &["a", "b", "c"]);

        let teardown = mounts.register().unwrap();
        assert_eq!(entries(&log), vec!["mount a", "mount b", "mount c"]);

        assert_eq!(teardown.run(), 3);
        assert_eq!(
            entries(&log)[3..],
            ["dismount c", "dismount b", "dismount a"]
        );
    }

    #[test]
    fn teardown_is_idempotent() {
        let (mut mounts, _router, _bus) = registry();
        let log = recorded(&mut mounts, &["a", "b"]);

        let teardown = mounts.register().unwrap();
        assert_eq!(teardown.run(), 2);
        assert_eq!(teardown.run(), 0);
        assert_eq!(teardown.run(), 0);

        let dismounts = entries(&log)
            .iter()
            .filter(|e| e.starts_with("dismount"))
            .count();
        assert_eq!(dismounts, 2);
        assert!(!mounts.is_registered());
    }

    #[test]
    #[traced_test]
    fn failing_mount_does_not_block_siblings() {
        let (mut mounts, _router, bus) = registry();
        let log = MountLog::default();
        mounts.add(Arc::new(RecordingMountable::new("a", &log)));
        mounts.add(Arc::new(RecordingMountable::new("b", &log).failing_mount()));
        mounts.add(Arc::new(RecordingMountable::new("c", &log)));

        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&failures);
        let _sub = bus.subscribe(MOUNT_FAILED, move |event: &MetaDeckEvent| {
            if let MetaDeckEvent::MountFailed { resource, .. } = event {
                sink.lock().unwrap().push(resource.clone());
            }
            Ok(())
        });

        let teardown = mounts.register().unwrap();
        assert_eq!(entries(&log), vec!["mount a", "mount b", "mount c"]);
        assert_eq!(*failures.lock().unwrap(), vec!["b"]);
        assert!(logs_contain("mount failed, continuing"));

        // Only resources that mounted are dismounted.
        teardown.run();
        assert_eq!(entries(&log)[3..], ["dismount c", "dismount a"]);
    }

    #[test]
    fn failing_dismount_does_not_block_siblings() {
        let (mut mounts, _router, _bus) = registry();
        let log = MountLog::default();
        mounts.add(Arc::new(RecordingMountable::new("a", &log)));
        mounts.add(Arc::new(RecordingMountable::new("b", &log).failing_dismount()));
        mounts.add(Arc::new(RecordingMountable::new("c", &log)));

        let teardown = mounts.register().unwrap();
        assert_eq!(teardown.run(), 2);
        assert_eq!(
            entries(&log)[3..],
            ["dismount c", "dismount b", "dismount a"]
        );
    }

    #[test]
    #[traced_test]
    fn panicking_mount_is_isolated() {
        let (mut mounts, _router, bus) = registry();
        let log = MountLog::default();
        mounts.add(Arc::new(RecordingMountable::new("a", &log)));
        mounts.add(Arc::new(RecordingMountable::new("boom", &log).panicking_mount()));
        mounts.add(Arc::new(RecordingMountable::new("c", &log)));

        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&failures);
        let _sub = bus.subscribe(MOUNT_FAILED, move |event: &MetaDeckEvent| {
            if let MetaDeckEvent::MountFailed { resource, error } = event {
                sink.lock().unwrap().push((resource.clone(), error.clone()));
            }
            Ok(())
        });

        let teardown = mounts.register().unwrap();
        assert_eq!(entries(&log), vec!["mount a", "mount boom", "mount c"]);
        {
            let failures = failures.lock().unwrap();
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].0, "boom");
            assert!(failures[0].1.contains("mount boom panicked"));
        }
        assert!(logs_contain("mount failed, continuing"));

        assert_eq!(teardown.run(), 2);
        assert_eq!(entries(&log)[3..], ["dismount c", "dismount a"]);
        assert!(!mounts.is_registered());
        assert!(mounts.register().is_ok());
    }

    #[test]
    fn panicking_dismount_does_not_stop_teardown() {
        let (mut mounts, _router, _bus) = registry();
        let log = MountLog::default();
        mounts.add(Arc::new(RecordingMountable::new("a", &log)));
        mounts.add(Arc::new(RecordingMountable::new("boom", &log).panicking_dismount()));
        mounts.add(Arc::new(RecordingMountable::new("c", &log)));

        let teardown = mounts.register().unwrap();
        assert_eq!(teardown.run(), 2);
        assert_eq!(
            entries(&log)[3..],
            ["dismount c", "dismount boom", "dismount a"]
        );
        assert!(!mounts.is_registered());
    }

    #[test]
    fn double_register_is_rejected_until_teardown() {
        let (mut mounts, _router, _bus) = registry();
        let log = recorded(&mut mounts, &["a"]);

        let first = mounts.register().unwrap();
        assert!(matches!(
            mounts.register(),
            Err(MetaDeckError::AlreadyRegistered)
        ));
        assert_eq!(entries(&log), vec!["mount a"]);

        first.run();
        let second = mounts.register().unwrap();
        assert_eq!(entries(&log), vec!["mount a", "dismount a", "mount a"]);

        // A stale teardown cannot tear down a newer registration.
        assert_eq!(first.run(), 0);
        assert!(mounts.is_registered());
        assert_eq!(second.run(), 1);
    }

    #[test]
    fn lifecycle_events_are_published() {
        let (mut mounts, _router, bus) = registry();
        let _log = recorded(&mut mounts, &["a", "b"]);

        let seen = Arc::new(Mutex::new(Vec::new()));
        for event in [MOUNTED, DISMOUNTED] {
            let sink = Arc::clone(&seen);
            let _ = bus.subscribe(event, move |e: &MetaDeckEvent| {
                sink.lock().unwrap().push(e.clone());
                Ok(())
            });
        }

        mounts.register().unwrap().run();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                MetaDeckEvent::Mounted { resource: "a".into() },
                MetaDeckEvent::Mounted { resource: "b".into() },
                MetaDeckEvent::Dismounted { resource: "b".into() },
                MetaDeckEvent::Dismounted { resource: "a".into() },
            ]
        );
    }

    #[test]
    fn page_mounts_and_route_patches_attach_to_router() {
        let (mut mounts, router, _bus) = registry();
        mounts
            .add_page_mount("/metadeck/settings", Arc::new(|| serde_json::json!("settings")))
            .unwrap();
        mounts
            .add_route_patch("/library/app/:appid", Arc::new(|props| props))
            .unwrap();
        assert_eq!(mounts.len(), 2);
        assert!(router.calls().is_empty());

        let teardown = mounts.register().unwrap();
        assert!(router.has_route("/metadeck/settings"));
        assert_eq!(router.patch_count("/library/app/:appid"), 1);

        teardown.run();
        assert!(!router.has_route("/metadeck/settings"));
        assert_eq!(router.patch_count("/library/app/:appid"), 0);
        assert_eq!(
            router.calls(),
            vec![
                "add_route /metadeck/settings",
                "add_patch /library/app/:appid",
                "remove_patch /library/app/:appid",
                "remove_route /metadeck/settings",
            ]
        );
    }

    #[test]
    fn router_failure_is_isolated() {
        let (mut mounts, router, _bus) = registry();
        router.fail_on("/broken");
        mounts
            .add_page_mount("/broken", Arc::new(|| serde_json::Value::Null))
            .unwrap();
        mounts
            .add_page_mount("/metadeck/:module", Arc::new(|| serde_json::Value::Null))
            .unwrap();

        let teardown = mounts.register().unwrap();
        assert!(router.has_route("/metadeck/:module"));
        assert_eq!(teardown.run(), 1);
    }

    #[test]
    fn empty_registry_registers_cleanly() {
        let (mounts, _router, _bus) = registry();
        assert!(mounts.is_empty());
        let teardown = mounts.register().unwrap();
        assert!(mounts.is_registered());
        assert_eq!(teardown.run(), 0);
        assert!(!mounts.is_registered());
    }
}
