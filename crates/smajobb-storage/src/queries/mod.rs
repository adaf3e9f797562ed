// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table.

pub mod audit;
pub mod conversations;
pub mod messages;
