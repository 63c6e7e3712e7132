use std::sync::Arc;

use crate::auth::IdentityVerifier;
use crate::models::{Flashcard, FlashcardDeck, StudySession};
use crate::store::{DocumentStore, Records};

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main`; there is no process-wide client singleton.
#[derive(Clone)]
pub struct AppState {
    pub cards: Records<Flashcard>,
    pub decks: Records<FlashcardDeck>,
    pub sessions: Records<StudySession>,
    /// Pluggable token verifier. Default: IdentityToolkitVerifier.
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            cards: Records::new(Arc::clone(&store)),
            decks: Records::new(Arc::clone(&store)),
            sessions: Records::new(store),
            verifier,
        }
    }
}
