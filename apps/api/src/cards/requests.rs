//! Request bodies for `/cards`. Unknown fields are rejected; a client-supplied
//! `owner` is accepted and discarded.

use serde::{de::IgnoredAny, Deserialize};
use url::Url;

use crate::auth::UserId;
use crate::errors::AppError;
use crate::models::{Flashcard, FlashcardCreationData, MediaType};

/// GET body. `card` selects a single card; without it the caller's cards are listed.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardLookup {
    pub card: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCardRequest {
    pub key: String,
    pub value: String,
    #[serde(alias = "type")]
    pub media_type: MediaType,
    pub deck: String,
    #[serde(default, rename = "owner")]
    _owner: Option<IgnoredAny>,
}

impl CreateCardRequest {
    pub fn into_creation_data(self, caller: &UserId) -> Result<FlashcardCreationData, AppError> {
        validate_card(&self.key, &self.value, self.media_type)?;
        Ok(FlashcardCreationData {
            key: self.key,
            value: self.value,
            media_type: self.media_type,
            owner: caller.to_string(),
            deck: self.deck,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCardRequest {
    pub uid: String,
    pub key: String,
    pub value: String,
    #[serde(alias = "type")]
    pub media_type: MediaType,
    pub deck: String,
    #[serde(default, rename = "owner")]
    _owner: Option<IgnoredAny>,
}

impl UpdateCardRequest {
    pub fn into_card(self, caller: &UserId) -> Result<Flashcard, AppError> {
        if self.uid.trim().is_empty() {
            return Err(AppError::Validation("uid must not be empty".to_string()));
        }
        validate_card(&self.key, &self.value, self.media_type)?;
        Ok(Flashcard {
            uid: self.uid,
            key: self.key,
            value: self.value,
            media_type: self.media_type,
            owner: caller.to_string(),
            deck: self.deck,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteCardRequest {
    pub card_id: String,
}

/// Shared card checks: a non-empty key, and a URL value for media cards.
pub fn validate_card(key: &str, value: &str, media_type: MediaType) -> Result<(), AppError> {
    if key.trim().is_empty() {
        return Err(AppError::Validation("key must not be empty".to_string()));
    }
    if media_type.is_reference() {
        Url::parse(value).map_err(|e| {
            AppError::Validation(format!(
                "value must be a URL for {media_type:?} cards: {e}"
            ))
        })?;
    }
    Ok(())
}
