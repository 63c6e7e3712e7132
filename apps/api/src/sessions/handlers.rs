use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{info, warn};

use crate::auth::{authorize_request, check_ownership, OwnerQuery};
use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::models::StudySession;
use crate::sessions::requests::{CreateSessionRequest, DeleteSessionRequest, SessionLookup};
use crate::state::AppState;
use crate::store::DeleteOutcome;
use crate::training::on_session_added;

/// GET /sessions?owner=<token>
pub async fn handle_sessions_get(
    State(state): State<AppState>,
    query: OwnerQuery,
    body: JsonBody,
) -> Result<Response, AppError> {
    let caller = authorize_request(state.verifier.as_ref(), &query).await?;
    let lookup: SessionLookup = body.parse()?;

    match lookup.session_id {
        Some(session_id) => {
            let session = state.sessions.get_by_id(&session_id).await?;
            if !check_ownership(&session, &caller) {
                warn!("User {caller} attempted to read session {session_id}");
                return Err(AppError::Forbidden(
                    "User is not authorized to get this session.".to_string(),
                ));
            }
            Ok(Json(session).into_response())
        }
        None => {
            let sessions = state.sessions.list_by_owner(caller.as_str()).await?;
            Ok(Json(sessions).into_response())
        }
    }
}

/// POST /sessions?owner=<token>
/// Records a finished study session, then runs the session-added hook.
pub async fn handle_sessions_post(
    State(state): State<AppState>,
    query: OwnerQuery,
    body: JsonBody,
) -> Result<Json<StudySession>, AppError> {
    let caller = authorize_request(state.verifier.as_ref(), &query).await?;
    let data = body.parse::<CreateSessionRequest>()?.into_creation_data(&caller)?;

    let session = state.sessions.create(&data).await?;
    info!(
        "Recorded session {} ({} cards) for user {caller}",
        session.uid,
        session.cards_studied.len()
    );
    on_session_added(&session);
    Ok(Json(session))
}

/// DELETE /sessions?owner=<token>
pub async fn handle_sessions_delete(
    State(state): State<AppState>,
    query: OwnerQuery,
    body: JsonBody,
) -> Result<Json<serde_json::Value>, AppError> {
    let caller = authorize_request(state.verifier.as_ref(), &query).await?;
    let req: DeleteSessionRequest = body.parse()?;

    match state.sessions.delete(&req.session_id, caller.as_str()).await? {
        DeleteOutcome::Deleted => {
            info!("Deleted session {} for user {caller}", req.session_id);
            Ok(Json(json!({ "uid": req.session_id, "deleted": true })))
        }
        DeleteOutcome::Denied => {
            warn!("User {caller} attempted to delete session {}", req.session_id);
            Err(AppError::Forbidden(
                "User is not authorized to delete this session.".to_string(),
            ))
        }
    }
}
