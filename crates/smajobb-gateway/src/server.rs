// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. The two conversation
//! routes are the entire messaging surface other subsystems may use; no
//! other code path writes a message.

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use smajobb_core::GatewayError;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;
use crate::service::MessagingGateway;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub gateway: Arc<MessagingGateway>,
    pub auth: AuthConfig,
}

/// Server bind configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the full router: an unauthenticated health route plus the
/// authenticated /v1 conversation routes.
pub fn router(state: GatewayState) -> Router {
    let public_routes = Router::new().route("/health", get(handlers::get_public_health));

    let api_routes = Router::new()
        .route("/v1/conversations/{id}", get(handlers::get_conversation))
        .route("/v1/conversations/{id}", post(handlers::post_message))
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), GatewayError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| GatewayError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| GatewayError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::gateway_with_conversation;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    const TOKEN: &str = "svc-token";

    async fn test_router() -> Router {
        let t = gateway_with_conversation().await;
        // The TempDir guard lives inside TestGateway; leak it so the
        // database outlives the router in these request-level tests.
        let t = Box::leak(Box::new(t));
        router(GatewayState {
            gateway: t.gateway.clone(),
            auth: AuthConfig {
                bearer_token: Some(TOKEN.to_string()),
            },
        })
    }

    fn get_req(path: &str, user: Option<&str>, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_req(path: &str, user: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header("authorization", format!("Bearer {TOKEN}"))
            .header("x-user-id", user)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_needs_no_auth() {
        let app = test_router().await;
        let response = app.oneshot(get_req("/health", None, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn api_routes_reject_missing_or_wrong_token() {
        let app = test_router().await;
        let response = app
            .clone()
            .oneshot(get_req("/v1/conversations/conv-1", Some("minor-1"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(get_req("/v1/conversations/conv-1", Some("minor-1"), Some("wrong")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_user_header_is_unauthorized() {
        let app = test_router().await;
        let response = app
            .oneshot(get_req("/v1/conversations/conv-1", None, Some(TOKEN)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn send_then_fetch_round_trip() {
        let app = test_router().await;
        let response = app
            .clone()
            .oneshot(post_req(
                "/v1/conversations/conv-1",
                "minor-1",
                r#"{"intent": "propose_time", "variables": {"day": "Saturday", "time": "14:00"}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["content"], "Could we do it on Saturday at 14:00?");
        assert_eq!(json["intentLabel"], "Propose a time");
        assert_eq!(json["isFromMe"], true);

        let response = app
            .oneshot(get_req("/v1/conversations/conv-1", Some("adult-1"), Some(TOKEN)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "active");
        assert_eq!(json["otherParty"]["userId"], "minor-1");
        assert_eq!(json["job"]["title"], "Lawn mowing");
        assert_eq!(json["messages"][0]["isFromMe"], false);
        // Raw slot values are not part of any response shape.
        assert!(json["messages"][0].get("variables").is_none());
    }

    #[tokio::test]
    async fn missing_intent_is_400_intent_required() {
        let app = test_router().await;
        let response = app
            .oneshot(post_req("/v1/conversations/conv-1", "minor-1", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "INTENT_REQUIRED");
    }

    #[tokio::test]
    async fn contact_info_is_400_invalid_message() {
        let app = test_router().await;
        let response = app
            .oneshot(post_req(
                "/v1/conversations/conv-1",
                "adult-1",
                r#"{"intent": "ask_job_question", "variables": {"question": "mail me at a@b.com"}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "INVALID_MESSAGE");
        // The body never names the detector that fired.
        assert!(!json["error"].as_str().unwrap().to_lowercase().contains("email"));
    }

    #[tokio::test]
    async fn unknown_conversation_is_404() {
        let app = test_router().await;
        let response = app
            .oneshot(get_req("/v1/conversations/ghost", Some("minor-1"), Some(TOKEN)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
