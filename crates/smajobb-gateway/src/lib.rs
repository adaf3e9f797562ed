// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent-constrained messaging gateway.
//!
//! The HTTP surface and orchestration for youth-safe job messaging:
//! every send runs the rate limiter, the validation pipeline, the
//! transactional store append, and the audit trail, in that order. The
//! two conversation routes exposed here are the only way any subsystem
//! writes or reads a message.

pub mod auth;
pub mod handlers;
pub mod pipeline;
pub mod server;
pub mod service;

pub use auth::AuthConfig;
pub use server::{router, start_server, GatewayState, ServerConfig};
pub use service::{ConversationView, MessageView, MessagingGateway};
