// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles GET/POST /v1/conversations/{id} and the public health check.
//! All error responses share one JSON shape with a stable machine code;
//! the error taxonomy decides the status, the handler never invents one.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use smajobb_core::types::{ConversationId, UserId};
use smajobb_core::GatewayError;

use crate::server::GatewayState;

/// Request body for POST /v1/conversations/{id}.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Wire string of the intent. Absent or unrecognized values are
    /// rejected as `INTENT_REQUIRED`; there is no free-text field.
    #[serde(default)]
    pub intent: Option<String>,
    /// Raw slot values keyed by slot name.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Short, non-coaching description.
    pub error: String,
    /// Stable machine-readable code.
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Caller identity forwarded by the auth proxy in `X-User-Id`.
fn caller_from_headers(headers: &HeaderMap) -> Result<UserId, Response> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(UserId::from)
        .ok_or_else(|| error_response(&GatewayError::Unauthorized))
}

/// Map a gateway error onto status, headers, and the shared error body.
pub fn error_response(err: &GatewayError) -> Response {
    let status = match err {
        GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
        GatewayError::NotFound => StatusCode::NOT_FOUND,
        GatewayError::HardBlock { forbidden: true, .. } => StatusCode::FORBIDDEN,
        GatewayError::HardBlock { .. }
        | GatewayError::IntentRequired
        | GatewayError::InvalidMessage { .. } => StatusCode::BAD_REQUEST,
        GatewayError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        GatewayError::Storage { .. } | GatewayError::Config(_) | GatewayError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "request failed with internal error");
    }

    let body = ErrorResponse {
        // Internal faults get a fixed message so storage details never
        // leak; everything else already carries its public reason.
        error: if err.is_client_fault() {
            err.to_string()
        } else {
            "internal error".to_string()
        },
        code: err.code(),
        details: match err {
            GatewayError::InvalidMessage { details } => {
                Some(details.iter().take(1).cloned().collect())
            }
            _ => None,
        },
    };

    let mut response = (status, Json(body)).into_response();
    if let GatewayError::RateLimited { limit, remaining, reset_at } = err {
        let headers = response.headers_mut();
        if let Ok(v) = limit.to_string().parse() {
            headers.insert("x-ratelimit-limit", v);
        }
        if let Ok(v) = remaining.to_string().parse() {
            headers.insert("x-ratelimit-remaining", v);
        }
        if let Ok(v) = reset_at.to_string().parse() {
            headers.insert("x-ratelimit-reset", v);
        }
    }
    response
}

/// GET /v1/conversations/{id}
///
/// Returns the conversation view for a participant, marking the other
/// party's messages read as a side effect.
pub async fn get_conversation(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let caller = match caller_from_headers(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match state
        .gateway
        .fetch_conversation(&caller, &ConversationId(id))
        .await
    {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(&err),
    }
}

/// POST /v1/conversations/{id}
///
/// Sends an intent-templated message into the conversation.
pub async fn post_message(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<SendMessageRequest>,
) -> Response {
    let caller = match caller_from_headers(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match state
        .gateway
        .send_message(
            &caller,
            &ConversationId(id),
            body.intent.as_deref(),
            body.variables,
        )
        .await
    {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => error_response(&err),
    }
}

/// GET /health (unauthenticated, for process supervision).
pub async fn get_public_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
