// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The messaging gateway composition root.
//!
//! [`MessagingGateway`] is the only writer of messages in the system. It
//! orchestrates one send: rate limiter, conversation eligibility, the
//! validation pipeline, the transactional append, the audit trail, and
//! finally recipient notification. Notification and audit failures are
//! logged and swallowed; a stored message is never rolled back because a
//! side channel hiccuped.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use smajobb_config::model::{RateLimitConfig, SafetyConfig};
use smajobb_core::traits::{JobDirectory, JobSummary, NotificationKind, NotificationSink};
use smajobb_core::types::{
    Conversation, ConversationId, ConversationStatus, MessageId, ParticipantRole, StoredMessage,
    UserId,
};
use smajobb_core::GatewayError;
use smajobb_intents::{Intent, IntentRegistry};
use smajobb_ratelimit::RateLimiter;
use smajobb_storage::queries::{audit, conversations, messages};
use smajobb_storage::{AppendOutcome, AuditAction, AuditEntry, Database};

use crate::pipeline::{self, Rejection};

/// One message as clients see it. `content` is the rendered text; the raw
/// slot values never appear in any response shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: String,
    pub content: String,
    pub intent: String,
    pub intent_label: String,
    pub sender_id: String,
    pub read: bool,
    pub created_at: String,
    pub is_from_me: bool,
}

/// The opposite participant, as shown to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherPartyView {
    pub user_id: String,
    pub role: ParticipantRole,
}

/// Job context decoration on a conversation view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub job_ref: String,
    pub title: String,
}

/// A full conversation as returned by the fetch operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    pub id: String,
    pub status: ConversationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen_reason: Option<String>,
    pub other_party: OtherPartyView,
    pub job: Option<JobView>,
    pub messages: Vec<MessageView>,
}

/// Everything a send or fetch needs, wired once at startup.
pub struct MessagingGateway {
    db: Database,
    limiter: RateLimiter,
    registry: IntentRegistry,
    notifications: Arc<dyn NotificationSink>,
    jobs: Arc<dyn JobDirectory>,
    rate_limit: RateLimitConfig,
    safety: SafetyConfig,
}

impl MessagingGateway {
    pub fn new(
        db: Database,
        limiter: RateLimiter,
        notifications: Arc<dyn NotificationSink>,
        jobs: Arc<dyn JobDirectory>,
        rate_limit: RateLimitConfig,
        safety: SafetyConfig,
    ) -> Self {
        MessagingGateway {
            db,
            limiter,
            registry: IntentRegistry::new(),
            notifications,
            jobs,
            rate_limit,
            safety,
        }
    }

    pub fn registry(&self) -> &IntentRegistry {
        &self.registry
    }

    /// Validate, store, audit, and announce one message.
    pub async fn send_message(
        &self,
        caller: &UserId,
        conversation_id: &ConversationId,
        intent_raw: Option<&str>,
        variables: BTreeMap<String, String>,
    ) -> Result<MessageView, GatewayError> {
        // Quota first: a sender over the limit learns nothing about the
        // conversation, not even whether it exists.
        let decision = self.limiter.check(
            &format!("{caller}:message"),
            self.rate_limit.message_limit,
            self.rate_limit.interval_secs,
        );
        if !decision.allowed {
            self.record_audit(
                AuditEntry::new(AuditAction::RateLimitExceeded, "conversation", &conversation_id.0)
                    .actor(&caller.0),
            )
            .await;
            return Err(GatewayError::RateLimited {
                limit: decision.limit,
                remaining: decision.remaining,
                reset_at: decision.reset_at,
            });
        }

        let convo = conversations::get(&self.db, conversation_id)
            .await?
            .ok_or(GatewayError::NotFound)?;
        if !convo.is_participant(caller) {
            return Err(GatewayError::Unauthorized);
        }

        let validated =
            match pipeline::validate(&self.registry, &convo, intent_raw, &variables) {
                Ok(v) => v,
                Err(Rejection::ScannerBlocked { reason, categories }) => {
                    return Err(self
                        .handle_scanner_block(caller, &convo, reason, categories)
                        .await);
                }
                Err(rejection) => return Err(rejection.into_error()),
            };

        let msg = StoredMessage {
            id: MessageId(uuid::Uuid::new_v4().to_string()),
            conversation_id: conversation_id.clone(),
            sender_id: caller.clone(),
            intent: validated.intent.to_string(),
            variables: validated.variables,
            rendered_message: validated.rendered,
            read: false,
            created_at: now_rfc3339(),
        };

        match messages::append(&self.db, &msg).await? {
            AppendOutcome::Appended => {}
            // A freeze committed between our status read and the append.
            AppendOutcome::ConversationNotActive => return Err(GatewayError::forbidden_block()),
            AppendOutcome::ConversationMissing => return Err(GatewayError::NotFound),
        }

        self.record_audit(
            AuditEntry::new(AuditAction::MessageSent, "conversation", &conversation_id.0)
                .actor(&caller.0)
                .metadata(serde_json::json!({
                    "message_id": msg.id.0,
                    "intent": msg.intent,
                    "scan_hits": validated
                        .scan_hits
                        .iter()
                        .map(|c| c.to_string())
                        .collect::<Vec<_>>(),
                })),
        )
        .await;

        // Post-durability only. A lost notification is an annoyance; a
        // rolled-back message would be a lie to the sender.
        if let Some(recipient) = convo.other_participant(caller) {
            if let Err(e) = self
                .notifications
                .notify(
                    &recipient.user_id,
                    NotificationKind::NewMessage,
                    "New message",
                    &msg.rendered_message,
                    Some(&format!("/conversations/{conversation_id}")),
                )
                .await
            {
                tracing::error!(
                    conversation_id = %conversation_id,
                    error = %e,
                    "failed to notify recipient of new message"
                );
            }
        }

        Ok(self.message_view(&msg, caller))
    }

    /// Load a conversation for one of its participants, marking the other
    /// party's messages read as a side effect.
    pub async fn fetch_conversation(
        &self,
        caller: &UserId,
        conversation_id: &ConversationId,
    ) -> Result<ConversationView, GatewayError> {
        let convo = conversations::get(&self.db, conversation_id)
            .await?
            .ok_or(GatewayError::NotFound)?;
        let other = convo
            .other_participant(caller)
            .ok_or(GatewayError::Unauthorized)?;

        messages::mark_read_from_other(&self.db, conversation_id, caller).await?;
        let history = messages::list_for_conversation(&self.db, conversation_id).await?;

        let job = match &convo.job_ref {
            Some(job_ref) => match self.jobs.job_summary(job_ref).await {
                Ok(summary) => summary.map(job_view),
                Err(e) => {
                    // Decoration only; the conversation is still readable.
                    tracing::warn!(job_ref = %job_ref.0, error = %e, "job lookup failed");
                    None
                }
            },
            None => None,
        };

        Ok(ConversationView {
            id: convo.id.0.clone(),
            status: convo.status,
            frozen_at: convo.frozen_at.clone(),
            frozen_reason: convo.frozen_reason.clone(),
            other_party: OtherPartyView {
                user_id: other.user_id.0.clone(),
                role: other.role,
            },
            job,
            messages: history
                .iter()
                .map(|m| self.message_view(m, caller))
                .collect(),
        })
    }

    /// One-way freeze, audited. Used by the automatic threshold path and
    /// exposed to moderation tooling; there is no unfreeze here.
    pub async fn freeze_conversation(
        &self,
        actor: Option<&UserId>,
        conversation_id: &ConversationId,
        reason: &str,
    ) -> Result<bool, GatewayError> {
        let transitioned = conversations::freeze(&self.db, conversation_id, reason).await?;
        if !transitioned {
            return Ok(false);
        }

        let mut entry =
            AuditEntry::new(AuditAction::ConversationFrozen, "conversation", &conversation_id.0)
                .metadata(serde_json::json!({ "reason": reason }));
        if let Some(actor) = actor {
            entry = entry.actor(&actor.0);
        }
        self.record_audit(entry).await;

        if let Ok(Some(convo)) = conversations::get(&self.db, conversation_id).await {
            for participant in [&convo.participant_a, &convo.participant_b] {
                if let Err(e) = self
                    .notifications
                    .notify(
                        &participant.user_id,
                        NotificationKind::ConversationFrozen,
                        "Conversation paused",
                        "This conversation has been paused by the platform.",
                        Some(&format!("/conversations/{conversation_id}")),
                    )
                    .await
                {
                    tracing::error!(
                        conversation_id = %conversation_id,
                        error = %e,
                        "failed to notify participant of freeze"
                    );
                }
            }
        }
        Ok(true)
    }

    /// Bookkeeping for a scanner-blocked send: audit it, bump the
    /// violation counter, and freeze at the threshold. Always returns the
    /// rejection the sender should see.
    async fn handle_scanner_block(
        &self,
        caller: &UserId,
        convo: &Conversation,
        reason: &'static str,
        categories: Vec<smajobb_safety::DetectionCategory>,
    ) -> GatewayError {
        self.record_audit(
            AuditEntry::new(AuditAction::MessageBlocked, "conversation", &convo.id.0)
                .actor(&caller.0)
                .metadata(serde_json::json!({
                    "categories": categories.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
                })),
        )
        .await;

        match conversations::record_violation(&self.db, &convo.id).await {
            Ok(count) if count >= self.safety.violation_freeze_threshold => {
                if let Err(e) = self
                    .freeze_conversation(None, &convo.id, "safety violation threshold reached")
                    .await
                {
                    tracing::error!(
                        conversation_id = %convo.id,
                        error = %e,
                        "automatic freeze failed"
                    );
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(
                    conversation_id = %convo.id,
                    error = %e,
                    "failed to record safety violation"
                );
            }
        }

        GatewayError::invalid_message(vec![reason.to_string()])
    }

    /// Audit writes must never fail a user-facing operation.
    async fn record_audit(&self, entry: AuditEntry) {
        if let Err(e) = audit::record(&self.db, &entry).await {
            tracing::error!(
                action = %entry.action,
                target_id = %entry.target_id,
                error = %e,
                "failed to write audit entry"
            );
        }
    }

    fn message_view(&self, msg: &StoredMessage, caller: &UserId) -> MessageView {
        let intent_label = Intent::from_str(&msg.intent)
            .map(|i| self.registry.get(i).label.to_string())
            .unwrap_or_else(|_| msg.intent.clone());
        MessageView {
            id: msg.id.0.clone(),
            content: msg.rendered_message.clone(),
            intent: msg.intent.clone(),
            intent_label,
            sender_id: msg.sender_id.0.clone(),
            read: msg.read,
            created_at: msg.created_at.clone(),
            is_from_me: msg.sender_id == *caller,
        }
    }
}

fn job_view(summary: JobSummary) -> JobView {
    JobView {
        job_ref: summary.job_ref.0,
        title: summary.title,
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
