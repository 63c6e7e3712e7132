use serde::{Deserialize, Serialize};

use crate::store::{Collection, Document};

/// The kind of content a card's `value` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    #[serde(alias = "text")]
    Text,
    #[serde(alias = "image")]
    Image,
    #[serde(alias = "audio")]
    Audio,
    #[serde(alias = "video")]
    Video,
}

impl MediaType {
    /// Non-text cards store a reference to the media rather than the content itself.
    pub fn is_reference(&self) -> bool {
        !matches!(self, MediaType::Text)
    }
}

/// A stored flashcard. `key` is the prompt side, `value` the answer side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    #[serde(default)]
    pub uid: String,
    pub key: String,
    pub value: String,
    pub media_type: MediaType,
    pub owner: String,
    #[serde(default)]
    pub deck: String,
}

impl Document for Flashcard {
    const COLLECTION: Collection = Collection::Cards;

    fn uid(&self) -> &str {
        &self.uid
    }

    fn owner(&self) -> &str {
        &self.owner
    }
}

/// The document written when a card is first created, before the store assigns `uid`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardCreationData {
    pub key: String,
    pub value: String,
    pub media_type: MediaType,
    pub owner: String,
    pub deck: String,
}
