// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the smajobb intent-constrained messaging gateway.
//!
//! This crate provides the shared domain types, the error taxonomy, and the
//! collaborator trait definitions used throughout the smajobb workspace.
//! Every other crate in the workspace depends on this one and nothing here
//! depends on storage, HTTP, or any other concrete infrastructure.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::GatewayError;
pub use types::{
    AgeBracket, Conversation, ConversationId, ConversationStatus, JobRef, MessageId, Participant,
    ParticipantRole, StoredMessage, UserId,
};

// Re-export collaborator traits at crate root.
pub use traits::{JobDirectory, JobSummary, NotificationSink};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_error_client_fault_split() {
        // Client faults: the caller can correct and retry.
        assert!(GatewayError::IntentRequired.is_client_fault());
        assert!(GatewayError::hard_block().is_client_fault());
        assert!(GatewayError::invalid_message(vec!["bad slot".into()]).is_client_fault());
        assert!(GatewayError::RateLimited {
            limit: 60,
            remaining: 0,
            reset_at: 0,
        }
        .is_client_fault());
        assert!(GatewayError::Unauthorized.is_client_fault());
        assert!(GatewayError::NotFound.is_client_fault());

        // System faults: never presented as a content rejection.
        assert!(!GatewayError::Internal("boom".into()).is_client_fault());
        assert!(!GatewayError::Storage {
            source: Box::new(std::io::Error::other("disk")),
        }
        .is_client_fault());
    }

    #[test]
    fn conversation_other_participant() {
        let convo = types::test_support::active_conversation();
        let minor = convo.participant_a.user_id.clone();
        let adult = convo.participant_b.user_id.clone();

        assert_eq!(convo.other_participant(&minor).unwrap().user_id, adult);
        assert_eq!(convo.other_participant(&adult).unwrap().user_id, minor);
        assert!(convo.other_participant(&UserId::from("stranger")).is_none());
    }

    #[test]
    fn conversation_involves_minor() {
        let convo = types::test_support::active_conversation();
        assert!(convo.involves_minor());
    }
}
