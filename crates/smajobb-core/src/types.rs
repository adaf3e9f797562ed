// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types for the messaging gateway.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumString};

/// Unique identifier for a platform user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        ConversationId(s.to_string())
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to the job/application context that anchors a conversation.
///
/// Two users may never message without a shared job context; the anchor is
/// itself a safety invariant, not bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobRef(pub String);

impl From<&str> for JobRef {
    fn from(s: &str) -> Self {
        JobRef(s.to_string())
    }
}

/// Coarse age classification used to select validation policy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AgeBracket {
    Minor,
    Adult,
}

/// Role a participant plays within the job context of a conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    Worker,
    Employer,
}

/// Lifecycle status of a conversation. The transition is one-way:
/// `Active -> Frozen`. Unfreezing is a privileged operation outside this
/// subsystem.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    Active,
    Frozen,
}

/// One side of a conversation: a user, their job-context role, and their
/// age bracket. Brackets and roles are written by the job subsystem when it
/// opens the conversation, so the send path needs no directory lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: UserId,
    pub role: ParticipantRole,
    pub age_bracket: AgeBracket,
}

/// The authoritative state of a two-party conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub participant_a: Participant,
    pub participant_b: Participant,
    pub status: ConversationStatus,
    /// Present iff `status == Frozen`. RFC 3339.
    pub frozen_at: Option<String>,
    /// Present iff `status == Frozen`.
    pub frozen_reason: Option<String>,
    /// The job context that justified this conversation's existence.
    pub job_ref: Option<JobRef>,
    /// RFC 3339; updated only on successful append.
    pub last_message_at: Option<String>,
    /// Count of scanner-blocked send attempts; drives automatic freezing.
    pub blocked_count: u32,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl Conversation {
    /// Whether the given user is one of the two participants.
    pub fn is_participant(&self, user: &UserId) -> bool {
        self.participant_a.user_id == *user || self.participant_b.user_id == *user
    }

    /// The participant record for the given user, if they are one.
    pub fn participant(&self, user: &UserId) -> Option<&Participant> {
        if self.participant_a.user_id == *user {
            Some(&self.participant_a)
        } else if self.participant_b.user_id == *user {
            Some(&self.participant_b)
        } else {
            None
        }
    }

    /// The participant opposite the given user, if the user is one.
    pub fn other_participant(&self, user: &UserId) -> Option<&Participant> {
        if self.participant_a.user_id == *user {
            Some(&self.participant_b)
        } else if self.participant_b.user_id == *user {
            Some(&self.participant_a)
        } else {
            None
        }
    }

    /// Whether either side of the conversation is in the minor bracket.
    pub fn involves_minor(&self) -> bool {
        self.participant_a.age_bracket == AgeBracket::Minor
            || self.participant_b.age_bracket == AgeBracket::Minor
    }

    /// Policy check for the permitted role pairing: a worker on one side,
    /// an employer on the other. Same-role pairs are never allowed to
    /// message.
    pub fn pairing_allowed(&self) -> bool {
        self.participant_a.role != self.participant_b.role
    }
}

/// A stored message. Created exactly once by the validation pipeline on a
/// successful send; immutable thereafter except for `read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    /// Intent identifier as its wire string (closed vocabulary).
    pub intent: String,
    /// Raw slot values as supplied by the sender. Never returned to clients.
    pub variables: BTreeMap<String, String>,
    /// The final, safety-checked text. The only text clients ever see.
    pub rendered_message: String,
    pub read: bool,
    /// RFC 3339.
    pub created_at: String,
}

/// Fixture builders shared by tests across the workspace.
pub mod test_support {
    use super::*;

    /// An active minor-worker / adult-employer conversation with a job anchor.
    pub fn active_conversation() -> Conversation {
        Conversation {
            id: ConversationId::from("conv-1"),
            participant_a: Participant {
                user_id: UserId::from("minor-1"),
                role: ParticipantRole::Worker,
                age_bracket: AgeBracket::Minor,
            },
            participant_b: Participant {
                user_id: UserId::from("adult-1"),
                role: ParticipantRole::Employer,
                age_bracket: AgeBracket::Adult,
            },
            status: ConversationStatus::Active,
            frozen_at: None,
            frozen_reason: None,
            job_ref: Some(JobRef::from("job-1")),
            last_message_at: None,
            blocked_count: 0,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_strum() {
        for status in [ConversationStatus::Active, ConversationStatus::Frozen] {
            let s = status.to_string();
            let parsed = ConversationStatus::from_str(&s).expect("should parse back");
            assert_eq!(status, parsed);
        }
        assert_eq!(ConversationStatus::Active.to_string(), "active");
        assert_eq!(ConversationStatus::Frozen.to_string(), "frozen");
    }

    #[test]
    fn age_bracket_serialization() {
        let minor = AgeBracket::Minor;
        let json = serde_json::to_string(&minor).expect("should serialize");
        assert_eq!(json, "\"minor\"");
        let parsed: AgeBracket = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(minor, parsed);
    }

    #[test]
    fn pairing_policy_rejects_same_role() {
        let mut convo = test_support::active_conversation();
        assert!(convo.pairing_allowed());
        convo.participant_b.role = ParticipantRole::Worker;
        assert!(!convo.pairing_allowed());
    }

    #[test]
    fn participant_lookup() {
        let convo = test_support::active_conversation();
        let p = convo.participant(&UserId::from("minor-1")).unwrap();
        assert_eq!(p.age_bracket, AgeBracket::Minor);
        assert!(convo.participant(&UserId::from("nobody")).is_none());
    }
}
