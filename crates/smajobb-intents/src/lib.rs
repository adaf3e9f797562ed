// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Closed intent vocabulary for the smajobb messaging gateway.
//!
//! Every message a user can send is drawn from the [`Intent`] enum and its
//! per-intent [`IntentTemplate`]. Adding a new message shape means adding an
//! enum variant and a template here -- the compiler's exhaustiveness check
//! at the registry boundary is what closes the free-text loophole, not a
//! convention.

pub mod intent;
pub mod registry;
pub mod render;

pub use intent::{Intent, SlotKind, TemplateSlot};
pub use registry::{IntentRegistry, IntentTemplate};
pub use render::{render, MAX_RENDERED_LEN};
