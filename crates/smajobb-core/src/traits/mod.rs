// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for external subsystems.
//!
//! The gateway consumes these interfaces; it never owns their
//! implementations. All traits use `#[async_trait]` for dynamic dispatch
//! compatibility so the composition root can inject any backend.

pub mod jobs;
pub mod notification;

pub use jobs::{JobDirectory, JobSummary};
pub use notification::{NotificationKind, NotificationSink};
