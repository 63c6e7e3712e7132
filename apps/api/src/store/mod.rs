//! Document store — collection-scoped JSON documents behind a trait.
//!
//! Backends:
//! - `PgDocumentStore`: one JSONB table keyed by `(collection, id)` (production).
//! - `MemoryDocumentStore`: process-local map (local development and tests).
//!
//! Entity code never talks to a backend directly; it goes through `Records<T>`.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod memory;
pub mod postgres;
pub mod records;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use records::{DeleteOutcome, Document, Records, UpdateOutcome};

/// The top-level collections of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Cards,
    Decks,
    Sessions,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Cards => "cards",
            Collection::Decks => "decks",
            Collection::Sessions => "sessions",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection}/{id} does not exist")]
    NotFound { collection: Collection, id: String },

    #[error("Store backend error: {0}")]
    Backend(#[from] sqlx::Error),

    /// Field names are written into SQL as literals, so only `[A-Za-z0-9_]` is accepted.
    #[error("Field name {0:?} cannot be queried")]
    InvalidField(String),

    #[error("Stored document in {collection} could not be decoded: {source}")]
    Decode {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },
}

/// Collection-scoped CRUD over JSON documents.
///
/// Carried in `AppState` as `Arc<dyn DocumentStore>`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document and returns the identifier the store generated for it.
    async fn insert(&self, collection: Collection, doc: Value) -> Result<String, StoreError>;

    /// Sets a single top-level field on an existing document.
    async fn set_field(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError>;

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError>;

    /// All documents whose top-level `field` is the string `value`. Unordered.
    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError>;

    /// Overwrites an existing document in full.
    async fn replace(&self, collection: Collection, id: &str, doc: Value)
        -> Result<(), StoreError>;

    /// Removes a document. Deleting an absent id is not an error.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}

/// Identifier format for newly inserted documents.
pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
