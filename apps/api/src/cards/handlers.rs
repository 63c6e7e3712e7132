use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{info, warn};

use crate::auth::{authorize_request, check_ownership, OwnerQuery};
use crate::cards::requests::{CardLookup, CreateCardRequest, DeleteCardRequest, UpdateCardRequest};
use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::models::Flashcard;
use crate::state::AppState;
use crate::store::{DeleteOutcome, UpdateOutcome};

/// GET /cards?owner=<token>
/// Body `{card}` returns one card; an empty body lists the caller's cards.
pub async fn handle_cards_get(
    State(state): State<AppState>,
    query: OwnerQuery,
    body: JsonBody,
) -> Result<Response, AppError> {
    let caller = authorize_request(state.verifier.as_ref(), &query).await?;
    let lookup: CardLookup = body.parse()?;

    match lookup.card {
        Some(card_id) => {
            let card = state.cards.get_by_id(&card_id).await?;
            if !check_ownership(&card, &caller) {
                warn!("User {caller} attempted to read card {card_id}");
                return Err(AppError::Forbidden(
                    "User is not authorized to get this card.".to_string(),
                ));
            }
            Ok(Json(card).into_response())
        }
        None => {
            let cards = state.cards.list_by_owner(caller.as_str()).await?;
            Ok(Json(cards).into_response())
        }
    }
}

/// POST /cards?owner=<token>
pub async fn handle_cards_post(
    State(state): State<AppState>,
    query: OwnerQuery,
    body: JsonBody,
) -> Result<Json<Flashcard>, AppError> {
    let caller = authorize_request(state.verifier.as_ref(), &query).await?;
    let data = body.parse::<CreateCardRequest>()?.into_creation_data(&caller)?;

    let card = state.cards.create(&data).await?;
    info!("Created card {} for user {caller}", card.uid);
    Ok(Json(card))
}

/// PUT /cards?owner=<token>
/// Overwrites the whole card; only the card's owner may do so.
pub async fn handle_cards_put(
    State(state): State<AppState>,
    query: OwnerQuery,
    body: JsonBody,
) -> Result<Json<Flashcard>, AppError> {
    let caller = authorize_request(state.verifier.as_ref(), &query).await?;
    let card = body.parse::<UpdateCardRequest>()?.into_card(&caller)?;

    match state.cards.update(&card, caller.as_str()).await? {
        UpdateOutcome::Updated => {
            info!("Updated card {} for user {caller}", card.uid);
            Ok(Json(state.cards.get_by_id(&card.uid).await?))
        }
        UpdateOutcome::Denied => {
            warn!("User {caller} attempted to update card {}", card.uid);
            Err(AppError::Forbidden(
                "User is not authorized to update this card.".to_string(),
            ))
        }
    }
}

/// DELETE /cards?owner=<token>
pub async fn handle_cards_delete(
    State(state): State<AppState>,
    query: OwnerQuery,
    body: JsonBody,
) -> Result<Json<serde_json::Value>, AppError> {
    let caller = authorize_request(state.verifier.as_ref(), &query).await?;
    let req: DeleteCardRequest = body.parse()?;

    match state.cards.delete(&req.card_id, caller.as_str()).await? {
        DeleteOutcome::Deleted => {
            info!("Deleted card {} for user {caller}", req.card_id);
            Ok(Json(json!({ "uid": req.card_id, "deleted": true })))
        }
        DeleteOutcome::Denied => {
            warn!("User {caller} attempted to delete card {}", req.card_id);
            Err(AppError::Forbidden(
                "User is not authorized to delete this card.".to_string(),
            ))
        }
    }
}
