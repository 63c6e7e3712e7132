//! Identity verification — exchanges an opaque owner token for a caller identity.
//!
//! All token checks are delegated to the identity provider; nothing is validated
//! locally. `AppState` holds an `Arc<dyn IdentityVerifier>` so tests can swap in a
//! fixed token table.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod policy;

pub use policy::{authorize_request, check_ownership, OwnerQuery};

/// The user identifier resolved from a credential token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Token is malformed, expired, revoked, or belongs to a disabled account.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The provider could not be reached or answered unexpectedly.
    #[error("Identity provider error: {0}")]
    Provider(String),
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    disabled: bool,
}

#[derive(Debug, Deserialize)]
struct LookupError {
    error: LookupErrorBody,
}

#[derive(Debug, Deserialize)]
struct LookupErrorBody {
    message: String,
}

/// Verifies ID tokens against the Identity Toolkit `accounts:lookup` endpoint.
#[derive(Clone)]
pub struct IdentityToolkitVerifier {
    client: Client,
    lookup_url: String,
    api_key: String,
}

impl IdentityToolkitVerifier {
    pub fn new(lookup_url: String, api_key: String) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Provider(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            lookup_url,
            api_key,
        })
    }
}

#[async_trait]
impl IdentityVerifier for IdentityToolkitVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let response = self
            .client
            .post(&self.lookup_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&LookupRequest { id_token: token })
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let user_id = classify_lookup(status, &body)?;
        debug!("Resolved owner token to user {user_id}");
        Ok(user_id)
    }
}

/// Maps a lookup reply to a caller identity. Only 400 means the token itself was
/// rejected; any other failure status is the provider's problem.
fn classify_lookup(status: StatusCode, body: &str) -> Result<UserId, AuthError> {
    if status == StatusCode::BAD_REQUEST {
        // The provider answers 400 for malformed, expired, and revoked tokens alike.
        let message = serde_json::from_str::<LookupError>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());
        return Err(AuthError::InvalidToken(message));
    }
    if !status.is_success() {
        return Err(AuthError::Provider(format!(
            "lookup returned {}: {}",
            status.as_u16(),
            body
        )));
    }
    user_id_from_lookup(body)
}

/// Extracts the caller identity from a successful `accounts:lookup` body.
fn user_id_from_lookup(body: &str) -> Result<UserId, AuthError> {
    let parsed: LookupResponse = serde_json::from_str(body)
        .map_err(|e| AuthError::Provider(format!("unexpected lookup response: {e}")))?;

    let user = parsed
        .users
        .into_iter()
        .next()
        .ok_or_else(|| AuthError::InvalidToken("USER_NOT_FOUND".to_string()))?;

    if user.disabled {
        return Err(AuthError::InvalidToken("USER_DISABLED".to_string()));
    }
    if user.local_id.is_empty() {
        return Err(AuthError::Provider("lookup returned an empty localId".to_string()));
    }
    Ok(UserId::new(user.local_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_from_lookup_takes_first_local_id() {
        let body = r#"{"kind":"identitytoolkit#GetAccountInfoResponse","users":[{"localId":"u1","email":"a@b.c"}]}"#;
        assert_eq!(user_id_from_lookup(body).unwrap(), UserId::new("u1"));
    }

    #[test]
    fn test_user_id_from_lookup_rejects_disabled_account() {
        let body = r#"{"users":[{"localId":"u1","disabled":true}]}"#;
        assert!(matches!(
            user_id_from_lookup(body),
            Err(AuthError::InvalidToken(msg)) if msg == "USER_DISABLED"
        ));
    }

    #[test]
    fn test_user_id_from_lookup_without_users_is_invalid_token() {
        assert!(matches!(
            user_id_from_lookup(r#"{"kind":"x"}"#),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_user_id_from_lookup_garbage_is_provider_error() {
        assert!(matches!(
            user_id_from_lookup("<html>"),
            Err(AuthError::Provider(_))
        ));
    }

    #[test]
    fn test_classify_lookup_bad_request_is_invalid_token() {
        let body = r#"{"error":{"code":400,"message":"INVALID_ID_TOKEN"}}"#;
        assert!(matches!(
            classify_lookup(StatusCode::BAD_REQUEST, body),
            Err(AuthError::InvalidToken(msg)) if msg == "INVALID_ID_TOKEN"
        ));
    }

    #[test]
    fn test_classify_lookup_other_failures_are_provider_errors() {
        for status in [
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            let body = r#"{"error":{"code":0,"message":"QUOTA_EXCEEDED"}}"#;
            assert!(
                matches!(classify_lookup(status, body), Err(AuthError::Provider(_))),
                "{status} should be a provider error"
            );
        }
    }

    #[test]
    fn test_classify_lookup_success_resolves_user() {
        let body = r#"{"users":[{"localId":"u1"}]}"#;
        assert_eq!(
            classify_lookup(StatusCode::OK, body).unwrap(),
            UserId::new("u1")
        );
    }

    /// Serves one canned HTTP reply on a local port and returns its lookup URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            // Read headers plus the declared body before answering.
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }
            let reply = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/v1/accounts:lookup")
    }

    async fn verify_against(
        status_line: &'static str,
        body: &'static str,
    ) -> Result<UserId, AuthError> {
        let url = serve_once(status_line, body).await;
        IdentityToolkitVerifier::new(url, "test-key".to_string())
            .unwrap()
            .verify("tok123")
            .await
    }

    #[tokio::test]
    async fn test_verify_resolves_user_on_success() {
        let result = verify_against("200 OK", r#"{"users":[{"localId":"u1"}]}"#).await;
        assert_eq!(result.unwrap(), UserId::new("u1"));
    }

    #[tokio::test]
    async fn test_verify_bad_request_is_invalid_token() {
        let result = verify_against(
            "400 Bad Request",
            r#"{"error":{"code":400,"message":"TOKEN_EXPIRED"}}"#,
        )
        .await;
        assert!(matches!(result, Err(AuthError::InvalidToken(msg)) if msg == "TOKEN_EXPIRED"));
    }

    #[tokio::test]
    async fn test_verify_rate_limit_is_provider_error() {
        let result = verify_against(
            "429 Too Many Requests",
            r#"{"error":{"code":429,"message":"QUOTA_EXCEEDED"}}"#,
        )
        .await;
        assert!(matches!(result, Err(AuthError::Provider(_))));
    }

    #[tokio::test]
    async fn test_verify_wrong_lookup_url_is_provider_error() {
        let result = verify_against("404 Not Found", "not here").await;
        assert!(matches!(result, Err(AuthError::Provider(_))));
    }

    #[test]
    fn test_lookup_request_uses_camel_case() {
        let json = serde_json::to_value(LookupRequest { id_token: "tok" }).unwrap();
        assert_eq!(json, serde_json::json!({"idToken": "tok"}));
    }
}
