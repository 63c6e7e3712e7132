//! Ownership policy: credential presence, credential exchange, and owner comparison.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use tracing::warn;

use super::{IdentityVerifier, UserId};
use crate::errors::AppError;
use crate::store::Document;

/// Query string carrying the caller's token as `?owner=<token>`.
#[derive(Debug, Default, Deserialize)]
pub struct OwnerQuery {
    pub owner: Option<String>,
}

/// Extracts `?owner=` with failures reported as `AppError::Validation` (JSON 400)
/// rather than axum's plain-text query rejection.
#[async_trait]
impl<S> FromRequestParts<S> for OwnerQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<OwnerQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        Ok(query)
    }
}

/// Presence check only. Validity is decided by `authorize`.
pub fn is_authenticated(query: &OwnerQuery) -> bool {
    query.owner.is_some()
}

/// Exchanges a token for the caller identity via the identity provider.
pub async fn authorize(verifier: &dyn IdentityVerifier, token: &str) -> Result<UserId, AppError> {
    verifier.verify(token).await.map_err(|e| {
        warn!("Owner token rejected: {e}");
        AppError::from(e)
    })
}

/// Presence check followed by `authorize`, so a request either carries a verified
/// caller or stops here.
pub async fn authorize_request(
    verifier: &dyn IdentityVerifier,
    query: &OwnerQuery,
) -> Result<UserId, AppError> {
    if !is_authenticated(query) {
        return Err(AppError::Unauthorized);
    }
    let token = query.owner.as_deref().unwrap_or_default();
    authorize(verifier, token).await
}

pub fn check_ownership<T: Document>(record: &T, caller: &UserId) -> bool {
    record.owner() == caller.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticVerifier;

    fn query(owner: Option<&str>) -> OwnerQuery {
        OwnerQuery {
            owner: owner.map(str::to_string),
        }
    }

    #[test]
    fn test_is_authenticated_only_checks_presence() {
        assert!(!is_authenticated(&query(None)));
        assert!(is_authenticated(&query(Some(""))));
        assert!(is_authenticated(&query(Some("not-a-real-token"))));
    }

    async fn extract_query(uri: &str) -> Result<OwnerQuery, AppError> {
        let request = axum::http::Request::builder().uri(uri).body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        OwnerQuery::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_owner_query_extracts_token() {
        let query = extract_query("/cards?owner=tok123").await.unwrap();
        assert_eq!(query.owner.as_deref(), Some("tok123"));
        assert!(extract_query("/cards").await.unwrap().owner.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_owner_is_validation_error() {
        let err = extract_query("/cards?owner=tok123&owner=tok456")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("owner")));
    }

    #[tokio::test]
    async fn test_authorize_request_without_owner_is_unauthorized() {
        let verifier = StaticVerifier::new(&[("tok123", "u1")]);
        let err = authorize_request(&verifier, &query(None)).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_authorize_request_with_unknown_token_is_rejected() {
        let verifier = StaticVerifier::new(&[("tok123", "u1")]);
        let err = authorize_request(&verifier, &query(Some("bogus")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }

    #[tokio::test]
    async fn test_authorize_request_resolves_caller() {
        let verifier = StaticVerifier::new(&[("tok123", "u1")]);
        let caller = authorize_request(&verifier, &query(Some("tok123")))
            .await
            .unwrap();
        assert_eq!(caller, UserId::new("u1"));
    }
}
