pub mod card;
pub mod deck;
pub mod session;

pub use card::{Flashcard, FlashcardCreationData, MediaType};
pub use deck::{FlashcardDeck, FlashcardDeckCreationData};
pub use session::{StudySession, StudySessionCard, StudySessionCreationData};
