//! Token service and identity gate contract tests.

use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use learnit::api::error::ApiError;
use learnit::auth::{require_auth, TokenService};
use secrecy::SecretString;
use uuid::Uuid;

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    headers
}

#[test]
fn issued_token_verifies_to_the_issuing_user() {
    let tokens = TokenService::new(&SecretString::from("integration-secret"));
    let user_id = Uuid::new_v4();

    let token = tokens.issue(user_id).unwrap();
    assert_eq!(tokens.verify(&token), Some(user_id));
}

#[test]
fn identity_gate_accepts_a_valid_bearer() {
    let tokens = TokenService::new(&SecretString::from("integration-secret"));
    let user_id = Uuid::new_v4();
    let token = tokens.issue(user_id).unwrap();

    assert_eq!(require_auth(&bearer(&token), &tokens).unwrap(), user_id);
}

#[test]
fn identity_gate_rejects_missing_and_invalid_tokens_with_401() {
    let tokens = TokenService::new(&SecretString::from("integration-secret"));

    let missing = require_auth(&HeaderMap::new(), &tokens).unwrap_err();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let invalid = require_auth(&bearer("junk"), &tokens).unwrap_err();
    assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn tokens_do_not_cross_between_secrets() {
    let server_a = TokenService::new(&SecretString::from("secret-a"));
    let server_b = TokenService::new(&SecretString::from("secret-b"));

    let token = server_a.issue(Uuid::new_v4()).unwrap();
    assert_eq!(server_b.verify(&token), None);
}

#[test]
fn a_token_survives_service_restart_with_the_same_secret() {
    // Stateless contract: a fresh service with the same secret accepts
    // tokens issued before it existed.
    let user_id = Uuid::new_v4();
    let token = TokenService::new(&SecretString::from("durable-secret"))
        .issue(user_id)
        .unwrap();

    let restarted = TokenService::new(&SecretString::from("durable-secret"));
    assert_eq!(restarted.verify(&token), Some(user_id));
}

#[tokio::test]
async fn failure_envelope_is_json_with_success_false() {
    let response = ApiError::Unauthorized("Invalid token".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid token");
}
