// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Re-resolves the server options whenever their inputs change.
//!
//! Resolutions may overlap when inputs change while a fetch is in flight.
//! Only the most recently started resolution may publish its options; older
//! ones are discarded when they finish.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use metadeck_core::events::{MetaDeckBus, MetaDeckEvent};
use metadeck_core::types::{ApiServer, ServerOption};
use tracing::debug;

use crate::resolver::{OfficialStatus, ProviderServerResolver};

type Inputs = (Vec<ApiServer>, Option<ApiServer>);

pub struct ServerOptionsWatcher {
    resolver: Arc<ProviderServerResolver>,
    bus: MetaDeckBus,
    generation: AtomicU64,
    last_inputs: Mutex<Option<Inputs>>,
    options: Mutex<Vec<ServerOption>>,
}

impl ServerOptionsWatcher {
    pub fn new(resolver: Arc<ProviderServerResolver>, bus: MetaDeckBus) -> Self {
        Self {
            resolver,
            bus,
            generation: AtomicU64::new(0),
            last_inputs: Mutex::new(None),
            options: Mutex::new(Vec::new()),
        }
    }

    /// The options published by the latest completed resolution.
    pub fn options(&self) -> Vec<ServerOption> {
        self.options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolve again if `custom` or `selected` differ from the last call.
    ///
    /// Returns the new options, or `None` when the inputs were unchanged or a
    /// newer resolution superseded this one.
    pub async fn update(
        &self,
        custom: &[ApiServer],
        selected: Option<&ApiServer>,
    ) -> Option<Vec<ServerOption>> {
        let inputs = (custom.to_vec(), selected.cloned());
        {
            let mut last = self
                .last_inputs
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if last.as_ref() == Some(&inputs) {
                debug!("server option inputs unchanged, skipping resolution");
                return None;
            }
            *last = Some(inputs);
        }
        self.resolve(custom, selected).await
    }

    /// Resolve unconditionally.
    pub async fn refresh(
        &self,
        custom: &[ApiServer],
        selected: Option<&ApiServer>,
    ) -> Option<Vec<ServerOption>> {
        *self
            .last_inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some((custom.to_vec(), selected.cloned()));
        self.resolve(custom, selected).await
    }

    async fn resolve(
        &self,
        custom: &[ApiServer],
        selected: Option<&ApiServer>,
    ) -> Option<Vec<ServerOption>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let resolution = self.resolver.resolve(custom, selected).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding superseded server resolution");
            return None;
        }

        let options = resolution.options();
        *self.options.lock().unwrap_or_else(PoisonError::into_inner) = options.clone();
        self.bus.emit(&MetaDeckEvent::ServerOptionsResolved {
            options: options.len(),
            official_available: matches!(resolution.official, OfficialStatus::Fetched(_)),
        });
        Some(options)
    }
}
