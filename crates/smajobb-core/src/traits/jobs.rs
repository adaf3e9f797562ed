// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job lookup collaborator.
//!
//! Job CRUD lives in a different subsystem; the gateway only needs a
//! read-only view to decorate conversation responses with job context.

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::types::JobRef;

/// A minimal job summary for display alongside a conversation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct JobSummary {
    pub job_ref: JobRef,
    pub title: String,
}

/// Read-only access to the job subsystem.
#[async_trait]
pub trait JobDirectory: Send + Sync {
    /// Look up the summary for a job reference. `None` when the job no
    /// longer exists (the conversation keeps its anchor regardless).
    async fn job_summary(&self, job_ref: &JobRef) -> Result<Option<JobSummary>, GatewayError>;
}
