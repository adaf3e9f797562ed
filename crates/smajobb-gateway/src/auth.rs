// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service-token authentication for the gateway.
//!
//! The gateway sits behind the platform's auth proxy, which terminates
//! user sessions and forwards the caller identity in `X-User-Id`. This
//! middleware checks the proxy's bearer token; with no token configured,
//! all requests are rejected (fail-closed).

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// Authentication configuration for the gateway.
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected bearer token from the upstream proxy.
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Middleware validating `Authorization: Bearer <token>`.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(ref expected_token) = auth.bearer_token else {
        tracing::error!("gateway has no auth token configured -- rejecting request");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let supplied = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match supplied {
        Some(token) if token == expected_token => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_the_token() {
        let config = AuthConfig {
            bearer_token: Some("svc-secret".to_string()),
        };
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("svc-secret"));
        assert!(debug_output.contains("[redacted]"));
    }

    #[test]
    fn missing_token_config_is_distinguishable() {
        let config = AuthConfig { bearer_token: None };
        assert!(config.bearer_token.is_none());
    }
}
