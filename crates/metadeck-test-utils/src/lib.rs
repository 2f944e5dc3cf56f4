// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for MetaDeck.
//!
//! Fakes for every host collaborator trait, recording the calls made against
//! them for assertion in tests.

pub mod mock_globals;
pub mod mock_router;
pub mod mock_source;
pub mod recording_mount;

pub use mock_globals::{CountingRuntime, FakeHostGlobals, MemorySettings, RecordingDiagnostics};
pub use mock_router::MockRouter;
pub use mock_source::{PendingServerSource, SequencedServerSource, StaticServerSource};
pub use recording_mount::{MountLog, RecordingMountable};
