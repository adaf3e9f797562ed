// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification delivery collaborator.
//!
//! Dispatch happens only after a message is durably stored. A delivery
//! failure must never roll back the send; the gateway logs it and moves on.

use async_trait::async_trait;
use strum::{Display, EnumString};

use crate::error::GatewayError;
use crate::types::UserId;

/// Category of notification pushed to a recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    NewMessage,
    ConversationFrozen,
}

/// Sink for recipient notifications (push, email digest, in-app badge --
/// whatever the notification subsystem decides).
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a notification to a single user.
    async fn notify(
        &self,
        user: &UserId,
        kind: NotificationKind,
        title: &str,
        body: &str,
        link: Option<&str>,
    ) -> Result<(), GatewayError>;
}
