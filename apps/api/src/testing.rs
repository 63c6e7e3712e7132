//! Test doubles and router helpers shared by handler tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::{AuthError, IdentityVerifier, UserId};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::MemoryDocumentStore;

/// Identity verifier backed by a fixed token → user table.
pub struct StaticVerifier {
    tokens: HashMap<String, String>,
}

impl StaticVerifier {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            tokens: pairs
                .iter()
                .map(|(t, u)| (t.to_string(), u.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        self.tokens
            .get(token)
            .map(UserId::new)
            .ok_or_else(|| AuthError::InvalidToken("INVALID_ID_TOKEN".to_string()))
    }
}

/// Verifier whose provider is always unreachable.
pub struct UnreachableVerifier;

#[async_trait]
impl IdentityVerifier for UnreachableVerifier {
    async fn verify(&self, _token: &str) -> Result<UserId, AuthError> {
        Err(AuthError::Provider("connection refused".to_string()))
    }
}

/// State over a fresh in-memory store where `tok123` → `u1` and `tok456` → `u2`.
pub fn test_state() -> AppState {
    AppState::new(
        Arc::new(MemoryDocumentStore::new()),
        Arc::new(StaticVerifier::new(&[("tok123", "u1"), ("tok456", "u2")])),
    )
}

/// Sends one JSON request through the full router and returns status and parsed body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    (status, value)
}

pub fn app(state: AppState) -> Router {
    build_router(state)
}
