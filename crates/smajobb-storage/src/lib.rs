// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the smajobb messaging gateway.
//!
//! Conversations, messages, and the append-only audit log. All writes
//! serialize through tokio-rusqlite's single background thread, which is
//! what lets the message append re-check conversation status inside the
//! same transaction as the insert.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::{AppendOutcome, AuditAction, AuditEntry};
