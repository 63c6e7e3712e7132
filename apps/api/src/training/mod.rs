// Learning-model endpoints. Prediction and training accept any request and do no
// work; model upload always fails until a model store exists.

use axum::{extract::Path, http::StatusCode};
use tracing::debug;

use crate::errors::AppError;
use crate::models::StudySession;

/// /predict (any method)
pub async fn handle_predict() -> StatusCode {
    StatusCode::OK
}

/// /train (any method)
pub async fn handle_train() -> StatusCode {
    StatusCode::OK
}

/// PUT /models/:user_id
pub async fn handle_model_upload(Path(user_id): Path<String>) -> Result<StatusCode, AppError> {
    debug!("Rejected model upload for user {user_id}");
    Err(AppError::NotImplemented)
}

/// Runs after a study session is recorded. Walks the studied cards without acting on them.
pub fn on_session_added(session: &StudySession) {
    for card in &session.cards_studied {
        debug!(
            session = %session.uid,
            card = %card.card_id,
            correct = card.correct,
            difficulty = card.difficulty,
            duration_ms = card.duration,
            "Session card received; no model to update"
        );
    }
}
