use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Collection, Document};

/// A record of cards reviewed in one sitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    #[serde(default)]
    pub uid: String,
    pub owner: String,
    /// When the session ended.
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub cards_studied: Vec<StudySessionCard>,
}

impl Document for StudySession {
    const COLLECTION: Collection = Collection::Sessions;

    fn uid(&self) -> &str {
        &self.uid
    }

    fn owner(&self) -> &str {
        &self.owner
    }
}

/// One card's result within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StudySessionCard {
    pub card_id: String,
    /// 1 if the user marked the card as recalled, otherwise 0.
    pub correct: u8,
    /// 0.0 is "very easy", 1.0 is "most difficult".
    pub difficulty: f64,
    /// Milliseconds taken to flip the card.
    pub duration: u64,
}

impl StudySessionCard {
    pub fn validate(&self) -> Result<(), String> {
        if self.card_id.trim().is_empty() {
            return Err("cardsStudied[].cardId must not be empty".to_string());
        }
        if self.correct > 1 {
            return Err(format!(
                "cardsStudied[].correct must be 0 or 1, got {}",
                self.correct
            ));
        }
        if !(0.0..=1.0).contains(&self.difficulty) {
            return Err(format!(
                "cardsStudied[].difficulty must be between 0 and 1, got {}",
                self.difficulty
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySessionCreationData {
    pub date: DateTime<Utc>,
    pub owner: String,
    pub cards_studied: Vec<StudySessionCard>,
}
