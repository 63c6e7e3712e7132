use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{info, warn};

use crate::auth::{authorize_request, check_ownership, OwnerQuery};
use crate::decks::requests::{CreateDeckRequest, DeckLookup, DeleteDeckRequest, UpdateDeckRequest};
use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::models::FlashcardDeck;
use crate::state::AppState;
use crate::store::{DeleteOutcome, UpdateOutcome};

/// GET /decks?owner=<token>
pub async fn handle_decks_get(
    State(state): State<AppState>,
    query: OwnerQuery,
    body: JsonBody,
) -> Result<Response, AppError> {
    let caller = authorize_request(state.verifier.as_ref(), &query).await?;
    let lookup: DeckLookup = body.parse()?;

    match lookup.deck {
        Some(deck_id) => {
            let deck = state.decks.get_by_id(&deck_id).await?;
            if !check_ownership(&deck, &caller) {
                warn!("User {caller} attempted to read deck {deck_id}");
                return Err(AppError::Forbidden(
                    "User is not authorized to get this deck.".to_string(),
                ));
            }
            Ok(Json(deck).into_response())
        }
        None => {
            let decks = state.decks.list_by_owner(caller.as_str()).await?;
            info!("Fetched {} decks for user {caller}", decks.len());
            Ok(Json(decks).into_response())
        }
    }
}

/// POST /decks?owner=<token>
pub async fn handle_decks_post(
    State(state): State<AppState>,
    query: OwnerQuery,
    body: JsonBody,
) -> Result<Json<FlashcardDeck>, AppError> {
    let caller = authorize_request(state.verifier.as_ref(), &query).await?;
    let data = body.parse::<CreateDeckRequest>()?.into_creation_data(&caller)?;

    let deck = state.decks.create(&data).await?;
    info!(
        "Created deck {} with {} cards for user {caller}",
        deck.uid,
        deck.cards.len()
    );
    Ok(Json(deck))
}

/// PUT /decks?owner=<token>
pub async fn handle_decks_put(
    State(state): State<AppState>,
    query: OwnerQuery,
    body: JsonBody,
) -> Result<Json<FlashcardDeck>, AppError> {
    let caller = authorize_request(state.verifier.as_ref(), &query).await?;
    let deck = body.parse::<UpdateDeckRequest>()?.into_deck(&caller)?;

    match state.decks.update(&deck, caller.as_str()).await? {
        UpdateOutcome::Updated => {
            info!("Updated deck {} for user {caller}", deck.uid);
            Ok(Json(state.decks.get_by_id(&deck.uid).await?))
        }
        UpdateOutcome::Denied => {
            warn!("User {caller} attempted to update deck {}", deck.uid);
            Err(AppError::Forbidden(
                "User is not authorized to update this deck.".to_string(),
            ))
        }
    }
}

/// DELETE /decks?owner=<token>
/// Cards referencing the deck are left in place.
pub async fn handle_decks_delete(
    State(state): State<AppState>,
    query: OwnerQuery,
    body: JsonBody,
) -> Result<Json<serde_json::Value>, AppError> {
    let caller = authorize_request(state.verifier.as_ref(), &query).await?;
    let req: DeleteDeckRequest = body.parse()?;

    match state.decks.delete(&req.deck_id, caller.as_str()).await? {
        DeleteOutcome::Deleted => {
            info!("Deleted deck {} for user {caller}", req.deck_id);
            Ok(Json(json!({ "uid": req.deck_id, "deleted": true })))
        }
        DeleteOutcome::Denied => {
            warn!("User {caller} attempted to delete deck {}", req.deck_id);
            Err(AppError::Forbidden(
                "User is not authorized to delete this deck.".to_string(),
            ))
        }
    }
}
