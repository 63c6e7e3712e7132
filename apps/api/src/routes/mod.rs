pub mod health;

use axum::{
    routing::{any, get, put},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::{cards, decks, sessions, training};

async fn method_not_supported() -> Result<(), AppError> {
    Err(AppError::MethodNotSupported)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/cards",
            get(cards::handlers::handle_cards_get)
                .post(cards::handlers::handle_cards_post)
                .put(cards::handlers::handle_cards_put)
                .delete(cards::handlers::handle_cards_delete)
                .fallback(method_not_supported),
        )
        .route(
            "/decks",
            get(decks::handlers::handle_decks_get)
                .post(decks::handlers::handle_decks_post)
                .put(decks::handlers::handle_decks_put)
                .delete(decks::handlers::handle_decks_delete)
                .fallback(method_not_supported),
        )
        .route(
            "/sessions",
            get(sessions::handlers::handle_sessions_get)
                .post(sessions::handlers::handle_sessions_post)
                .delete(sessions::handlers::handle_sessions_delete)
                .fallback(method_not_supported),
        )
        // Learning model placeholders
        .route("/predict", any(training::handle_predict))
        .route("/train", any(training::handle_train))
        .route(
            "/models/:user_id",
            put(training::handle_model_upload).fallback(method_not_supported),
        )
        .with_state(state)
}
