// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A mountable that records its lifecycle calls into a shared log.

use std::sync::{Arc, Mutex};

use metadeck_core::traits::Mountable;
use metadeck_core::MetaDeckError;

/// Shared, ordered log of `"mount <name>"` / `"dismount <name>"` entries.
pub type MountLog = Arc<Mutex<Vec<String>>>;

/// How one lifecycle call of a [`RecordingMountable`] behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Outcome {
    #[default]
    Succeed,
    Fail,
    Panic,
}

pub struct RecordingMountable {
    name: String,
    log: MountLog,
    on_mount: Outcome,
    on_dismount: Outcome,
}

impl RecordingMountable {
    pub fn new(name: impl Into<String>, log: &MountLog) -> Self {
        Self {
            name: name.into(),
            log: Arc::clone(log),
            on_mount: Outcome::Succeed,
            on_dismount: Outcome::Succeed,
        }
    }

    pub fn failing_mount(mut self) -> Self {
        self.on_mount = Outcome::Fail;
        self
    }

    pub fn failing_dismount(mut self) -> Self {
        self.on_dismount = Outcome::Fail;
        self
    }

    pub fn panicking_mount(mut self) -> Self {
        self.on_mount = Outcome::Panic;
        self
    }

    pub fn panicking_dismount(mut self) -> Self {
        self.on_dismount = Outcome::Panic;
        self
    }

    fn record(&self, op: &str, outcome: Outcome) -> Result<(), MetaDeckError> {
        self.log.lock().unwrap().push(format!("{op} {}", self.name));
        match outcome {
            Outcome::Succeed => Ok(()),
            Outcome::Fail => Err(MetaDeckError::Mount {
                resource: self.name.clone(),
                message: format!("{op} failed"),
            }),
            Outcome::Panic => panic!("{op} {} panicked", self.name),
        }
    }
}

impl Mountable for RecordingMountable {
    fn name(&self) -> &str {
        &self.name
    }

    fn mount(&self) -> Result<(), MetaDeckError> {
        self.record("mount", self.on_mount)
    }

    fn dismount(&self) -> Result<(), MetaDeckError> {
        self.record("dismount", self.on_dismount)
    }
}
