use chrono::{DateTime, Utc};
use serde::{de::IgnoredAny, Deserialize};

use crate::auth::UserId;
use crate::errors::AppError;
use crate::models::{StudySessionCard, StudySessionCreationData};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionLookup {
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateSessionRequest {
    /// ISO-8601 timestamp of when the session ended.
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub cards_studied: Vec<StudySessionCard>,
    #[serde(default, rename = "owner")]
    _owner: Option<IgnoredAny>,
}

impl CreateSessionRequest {
    pub fn into_creation_data(
        self,
        caller: &UserId,
    ) -> Result<StudySessionCreationData, AppError> {
        for card in &self.cards_studied {
            card.validate().map_err(AppError::Validation)?;
        }
        Ok(StudySessionCreationData {
            date: self.date,
            owner: caller.to_string(),
            cards_studied: self.cards_studied,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteSessionRequest {
    pub session_id: String,
}
