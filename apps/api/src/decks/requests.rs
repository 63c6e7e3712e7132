use serde::{de::IgnoredAny, Deserialize};

use crate::auth::UserId;
use crate::cards::requests::validate_card;
use crate::errors::AppError;
use crate::models::{Flashcard, FlashcardDeck, FlashcardDeckCreationData, MediaType};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeckLookup {
    pub deck: Option<String>,
}

/// A card embedded in a deck body. Its owner is always the deck's owner.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeckCardInput {
    #[serde(default)]
    pub uid: String,
    pub key: String,
    pub value: String,
    #[serde(alias = "type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub deck: String,
    #[serde(default, rename = "owner")]
    _owner: Option<IgnoredAny>,
}

impl DeckCardInput {
    fn into_card(self, caller: &UserId) -> Result<Flashcard, AppError> {
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
pub struct CreateDeckRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cards: Vec<DeckCardInput>,
    #[serde(default, rename = "owner")]
    _owner: Option<IgnoredAny>,
}

impl CreateDeckRequest {
    pub fn into_creation_data(
        self,
        caller: &UserId,
    ) -> Result<FlashcardDeckCreationData, AppError> {
        validate_title(&self.title)?;
        Ok(FlashcardDeckCreationData {
            title: self.title,
            description: self.description,
            cards: embed_cards(self.cards, caller)?,
            owner: caller.to_string(),
            cards_due: Vec::new(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateDeckRequest {
    pub uid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cards: Vec<DeckCardInput>,
    #[serde(default, rename = "owner")]
    _owner: Option<IgnoredAny>,
    #[serde(default, rename = "cardsDue")]
    _cards_due: Option<IgnoredAny>,
}

impl UpdateDeckRequest {
    pub fn into_deck(self, caller: &UserId) -> Result<FlashcardDeck, AppError> {
        if self.uid.trim().is_empty() {
            return Err(AppError::Validation("uid must not be empty".to_string()));
        }
        validate_title(&self.title)?;
        Ok(FlashcardDeck {
            uid: self.uid,
            title: self.title,
            description: self.description,
            cards: embed_cards(self.cards, caller)?,
            owner: caller.to_string(),
            cards_due: Vec::new(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteDeckRequest {
    pub deck_id: String,
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    Ok(())
}

fn embed_cards(cards: Vec<DeckCardInput>, caller: &UserId) -> Result<Vec<Flashcard>, AppError> {
    cards.into_iter().map(|c| c.into_card(caller)).collect()
}
