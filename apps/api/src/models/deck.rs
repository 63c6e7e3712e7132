use serde::{Deserialize, Serialize};

use super::card::Flashcard;
use crate::store::{Collection, Document};

/// A group of flashcards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardDeck {
    #[serde(default)]
    pub uid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cards: Vec<Flashcard>,
    pub owner: String,
    /// Always empty; no scheduler fills it.
    #[serde(default)]
    pub cards_due: Vec<Flashcard>,
}

impl Document for FlashcardDeck {
    const COLLECTION: Collection = Collection::Decks;

    fn uid(&self) -> &str {
        &self.uid
    }

    fn owner(&self) -> &str {
        &self.owner
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardDeckCreationData {
    pub title: String,
    pub description: String,
    pub cards: Vec<Flashcard>,
    pub owner: String,
    pub cards_due: Vec<Flashcard>,
}
