// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy for the messaging gateway.
//!
//! Every rejection a caller can see maps to exactly one variant here. The
//! variants deliberately carry short, non-coaching reasons: a rejection must
//! never enumerate which detector fired or why a conversation was frozen,
//! because that would hand a sender a checklist for evasion.

use thiserror::Error;

/// The primary error type used across the smajobb messaging gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Caller is not a participant of the addressed conversation.
    #[error("you do not have access to this conversation")]
    Unauthorized,

    /// Conversation (or another addressed entity) does not exist.
    #[error("not found")]
    NotFound,

    /// A structural precondition failed: frozen conversation, missing job
    /// anchor, disallowed role pairing. The public reason is always generic.
    /// `forbidden` is true when the sender may not message in this
    /// conversation at all (frozen, role policy), as opposed to a malformed
    /// request.
    #[error("{reason}")]
    HardBlock { reason: String, forbidden: bool },

    /// No intent supplied, or the supplied value is outside the closed enum.
    /// This variant is the system's core anti-free-text guarantee.
    #[error("please select a message type")]
    IntentRequired,

    /// Slot validation or the content scan rejected the message. Only the
    /// first reason is surfaced by default; the full list stays internal.
    #[error("{}", details.first().map(String::as_str).unwrap_or("message could not be sent"))]
    InvalidMessage { details: Vec<String> },

    /// The caller exhausted its send quota for the current window.
    #[error("too many messages, please wait before sending again")]
    RateLimited {
        limit: u32,
        remaining: u32,
        /// Unix timestamp (seconds) when the current window ends.
        reset_at: i64,
    },

    /// Storage backend errors (connection, query failure, serialization).
    /// Reported to clients as a generic system failure, never as a content
    /// rejection.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors surfaced during startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// A hard block with the standard generic reason.
    pub fn hard_block() -> Self {
        GatewayError::HardBlock {
            reason: "this message cannot be sent".to_string(),
            forbidden: false,
        }
    }

    /// A hard block for a sender who may not message in this conversation
    /// at all. Same generic public reason, stricter transport mapping.
    pub fn forbidden_block() -> Self {
        GatewayError::HardBlock {
            reason: "this message cannot be sent".to_string(),
            forbidden: true,
        }
    }

    /// An invalid-message rejection carrying one or more internal details.
    pub fn invalid_message(details: Vec<String>) -> Self {
        GatewayError::InvalidMessage { details }
    }

    /// Wrap a storage-layer error.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        GatewayError::Storage {
            source: Box::new(source),
        }
    }

    /// True when the caller can correct its input (or wait) and retry.
    /// False for faults in the system itself, which clients must be able to
    /// distinguish from "your message was unsafe".
    pub fn is_client_fault(&self) -> bool {
        !matches!(
            self,
            GatewayError::Storage { .. }
                | GatewayError::Config(_)
                | GatewayError::Internal(_)
        )
    }

    /// Stable machine-readable code for the HTTP surface.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Unauthorized => "UNAUTHORIZED",
            GatewayError::NotFound => "NOT_FOUND",
            GatewayError::HardBlock { .. } => "HARD_BLOCK",
            GatewayError::IntentRequired => "INTENT_REQUIRED",
            GatewayError::InvalidMessage { .. } => "INVALID_MESSAGE",
            GatewayError::RateLimited { .. } => "RATE_LIMITED",
            GatewayError::Storage { .. } | GatewayError::Config(_) | GatewayError::Internal(_) => {
                "INTERNAL"
            }
        }
    }
}
