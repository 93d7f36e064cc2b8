//! Per-handler permission layer driven through a router.
//!
//! Tests cover:
//! - Granted permission reaches the handler with the verified claims
//! - Missing header, wrong scheme, denied permission, missing permissions claim
//! - Verification failures collapsed vs. exposed
//! - Empty permission means "authenticated only"

mod common;

use std::sync::Arc;

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    handler::Handler,
    http::{Request, StatusCode, header},
    routing::get,
};
use casting_agency::{
    api::extractors::Claims, middleware::auth::RequirePermissionLayer,
    services::auth::Authorizer,
};
use common::{TestIssuer, claims_with, now};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn echo_claims(Claims(claims): Claims) -> Json<Value> {
    Json(json!({
        "subject": claims.subject(),
        "permissions": claims.permissions(),
    }))
}

fn app(authorizer: Arc<Authorizer>, permission: &str) -> Router {
    Router::new().route(
        "/protected",
        get(echo_claims.layer(RequirePermissionLayer::new(authorizer, permission))),
    )
}

async fn send(router: Router, authorization: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().uri("/protected");
    if let Some(value) = authorization {
        request = request.header(header::AUTHORIZATION, value);
    }

    let response = router
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn assert_rejected(body: &Value, code: &str) {
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], code);
    assert!(body["description"].is_string(), "{body}");
}

#[tokio::test]
async fn granted_permission_reaches_handler() {
    let issuer = TestIssuer::start().await;
    let token = issuer.token(&["get:actors"]);

    let (status, body) = send(
        app(issuer.authorizer(), "get:actors"),
        Some(&format!("Bearer {token}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], "auth0|casting-director");
    assert_eq!(body["permissions"], json!(["get:actors"]));
}

#[tokio::test]
async fn missing_header_is_rejected_before_handler() {
    let issuer = TestIssuer::start().await;

    let (status, body) = send(app(issuer.authorizer(), "get:movies"), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_rejected(&body, "authorization_header_missing");
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let issuer = TestIssuer::start().await;

    let (status, body) = send(app(issuer.authorizer(), "get:movies"), Some("Basic xyz")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_rejected(&body, "invalid_header_scheme");
}

#[tokio::test]
async fn bearer_without_token_is_rejected() {
    let issuer = TestIssuer::start().await;

    let (status, body) = send(app(issuer.authorizer(), "get:movies"), Some("Bearer")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_rejected(&body, "token_missing");
}

#[tokio::test]
async fn ungranted_permission_is_forbidden() {
    let issuer = TestIssuer::start().await;
    let token = issuer.token(&["get:actors"]);

    let (status, body) = send(
        app(issuer.authorizer(), "delete:actors"),
        Some(&format!("Bearer {token}")),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_rejected(&body, "permission_denied");
}

#[tokio::test]
async fn missing_permissions_claim_is_unauthorized() {
    let issuer = TestIssuer::start().await;
    let mut claims = claims_with(&[]);
    claims.as_object_mut().unwrap().remove("permissions");
    let token = issuer.key.sign(&claims);

    let (status, body) = send(
        app(issuer.authorizer(), "get:actors"),
        Some(&format!("Bearer {token}")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_rejected(&body, "permissions_claim_missing");
}

#[tokio::test]
async fn verification_failure_is_collapsed_by_default() {
    let issuer = TestIssuer::start().await;
    let mut claims = claims_with(&["get:actors"]);
    claims["exp"] = json!(now() - 60);
    let token = issuer.key.sign(&claims);

    let (status, body) = send(
        app(issuer.authorizer(), "get:actors"),
        Some(&format!("Bearer {token}")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_rejected(&body, "unauthorized");
}

#[tokio::test]
async fn verification_failure_is_exposed_when_enabled() {
    let issuer = TestIssuer::start().await;
    let authorizer = issuer.authorizer_with(|s| s.expose_verification_errors = true);
    let mut claims = claims_with(&["get:actors"]);
    claims["exp"] = json!(now() - 60);
    let token = issuer.key.sign(&claims);

    let (status, body) = send(
        app(authorizer.clone(), "get:actors"),
        Some(&format!("Bearer {token}")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_rejected(&body, "token_expired");

    let (status, body) = send(app(authorizer, "get:actors"), Some("Bearer not.a.jwt")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_rejected(&body, "token_unparseable");
}

#[tokio::test]
async fn empty_permission_only_requires_authentication() {
    let issuer = TestIssuer::start().await;
    let token = issuer.token(&[]);

    let (status, body) = send(
        app(issuer.authorizer(), ""),
        Some(&format!("Bearer {token}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permissions"], json!([]));

    let (status, body) = send(app(issuer.authorizer(), ""), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_rejected(&body, "authorization_header_missing");
}

#[tokio::test]
async fn layer_is_reusable_across_requests() {
    let issuer = TestIssuer::start().await;
    let router = app(issuer.authorizer(), "get:actors");
    let granted = format!("Bearer {}", issuer.token(&["get:actors"]));
    let denied = format!("Bearer {}", issuer.token(&["get:movies"]));

    let (status, _) = send(router.clone(), Some(&granted)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(router.clone(), Some(&denied)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(router, Some(&granted)).await;
    assert_eq!(status, StatusCode::OK);
}
