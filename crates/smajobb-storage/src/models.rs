// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage-level row types that are not part of the core domain model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Safety-relevant actions recorded in the audit trail.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    MessageSent,
    MessageBlocked,
    ConversationFrozen,
    RateLimitExceeded,
}

/// One append-only audit record. Never mutated or deleted by this
/// subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Row id; 0 until persisted.
    pub id: i64,
    pub action: AuditAction,
    /// Who performed the action (sender, moderator, or the system).
    pub actor_id: Option<String>,
    /// Who the action concerns, when different from the actor.
    pub subject_id: Option<String>,
    /// Entity kind the entry points at, e.g. `conversation`, `message`.
    pub target_type: String,
    pub target_id: String,
    /// Free-form JSON context (detection categories, freeze reason).
    pub metadata: Option<String>,
    /// RFC 3339; filled by the database on insert.
    pub created_at: String,
}

impl AuditEntry {
    /// Build an entry ready for insertion.
    pub fn new(action: AuditAction, target_type: &str, target_id: &str) -> Self {
        AuditEntry {
            id: 0,
            action,
            actor_id: None,
            subject_id: None,
            target_type: target_type.to_string(),
            target_id: target_id.to_string(),
            metadata: None,
            created_at: String::new(),
        }
    }

    pub fn actor(mut self, actor_id: &str) -> Self {
        self.actor_id = Some(actor_id.to_string());
        self
    }

    pub fn subject(mut self, subject_id: &str) -> Self {
        self.subject_id = Some(subject_id.to_string());
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata.to_string());
        self
    }
}

/// Result of a transactional message append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Message inserted and `last_message_at` updated.
    Appended,
    /// The conversation exists but is not `active`; nothing was written.
    ConversationNotActive,
    /// No such conversation; nothing was written.
    ConversationMissing,
}
