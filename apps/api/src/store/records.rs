//! Typed accessor over one collection of the document store.
//!
//! `Records<T>` is the only way entity code reads or writes documents. It owns the
//! create sequence (insert → write back `uid` → re-read) and the ownership-checked
//! update/delete paths, which report `Denied` instead of silently doing nothing.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{Collection, DocumentStore, StoreError};

/// A persisted entity with a store-assigned `uid` and an `owner`.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn uid(&self) -> &str;
    fn owner(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Denied,
}

pub struct Records<T> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Records<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<T: Document> Records<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Inserts `data`, writes the generated id back as `uid`, and returns the stored record.
    /// The three steps are not atomic.
    pub async fn create<D: Serialize + Sync>(&self, data: &D) -> Result<T, StoreError> {
        let doc = self.encode(data)?;
        let id = self.store.insert(T::COLLECTION, doc).await?;
        self.store
            .set_field(T::COLLECTION, &id, "uid", Value::String(id.clone()))
            .await?;
        debug!("Created {}/{}", T::COLLECTION, id);
        self.get_by_id(&id).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<T, StoreError> {
        let doc = self
            .store
            .get(T::COLLECTION, id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: T::COLLECTION,
                id: id.to_string(),
            })?;
        self.decode(doc)
    }

    /// Every record owned by `owner`. No pagination, no ordering guarantee.
    pub async fn list_by_owner(&self, owner: &str) -> Result<Vec<T>, StoreError> {
        self.store
            .find_by_field(T::COLLECTION, "owner", owner)
            .await?
            .into_iter()
            .map(|doc| self.decode(doc))
            .collect()
    }

    /// Full-record overwrite keyed by `record.uid()`, applied only when the stored
    /// record belongs to `caller`.
    pub async fn update(&self, record: &T, caller: &str) -> Result<UpdateOutcome, StoreError> {
        let existing = self.get_by_id(record.uid()).await?;
        if existing.owner() != caller {
            return Ok(UpdateOutcome::Denied);
        }
        let doc = self.encode(record)?;
        self.store.replace(T::COLLECTION, record.uid(), doc).await?;
        Ok(UpdateOutcome::Updated)
    }

    /// Deletes `id` when it belongs to `caller`. Dependent records are left in place.
    pub async fn delete(&self, id: &str, caller: &str) -> Result<DeleteOutcome, StoreError> {
        let existing = self.get_by_id(id).await?;
        if existing.owner() != caller {
            return Ok(DeleteOutcome::Denied);
        }
        self.store.delete(T::COLLECTION, id).await?;
        Ok(DeleteOutcome::Deleted)
    }

    fn encode<D: Serialize + ?Sized>(&self, data: &D) -> Result<Value, StoreError> {
        serde_json::to_value(data).map_err(|source| StoreError::Decode {
            collection: T::COLLECTION,
            source,
        })
    }

    fn decode(&self, doc: Value) -> Result<T, StoreError> {
        serde_json::from_value(doc).map_err(|source| StoreError::Decode {
            collection: T::COLLECTION,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Note {
        #[serde(default)]
        uid: String,
        owner: String,
        text: String,
    }

    impl Document for Note {
        const COLLECTION: Collection = Collection::Cards;

        fn uid(&self) -> &str {
            &self.uid
        }

        fn owner(&self) -> &str {
            &self.owner
        }
    }

    #[derive(Serialize)]
    struct NewNote<'a> {
        owner: &'a str,
        text: &'a str,
    }

    fn records() -> Records<Note> {
        Records::new(Arc::new(MemoryDocumentStore::new()))
    }

    #[tokio::test]
    async fn test_create_writes_back_uid() {
        let notes = records();
        let created = notes
            .create(&NewNote {
                owner: "u1",
                text: "hello",
            })
            .await
            .unwrap();

        assert!(!created.uid.is_empty());
        let fetched = notes.get_by_id(&created.uid).await.unwrap();
        assert_eq!(fetched.uid, created.uid);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let err = records().get_by_id("missing").await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                collection: Collection::Cards,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_list_by_owner_returns_only_that_owners_records() {
        let notes = records();
        let mut mine = Vec::new();
        for text in ["a", "b", "c"] {
            let n = notes.create(&NewNote { owner: "u1", text }).await.unwrap();
            mine.push(n.uid);
        }
        notes
            .create(&NewNote {
                owner: "u2",
                text: "x",
            })
            .await
            .unwrap();

        let mut listed: Vec<String> = notes
            .list_by_owner("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.uid)
            .collect();
        listed.sort();
        mine.sort();
        assert_eq!(listed, mine);
    }

    #[tokio::test]
    async fn test_delete_by_other_owner_is_denied_and_keeps_record() {
        let notes = records();
        let n = notes
            .create(&NewNote {
                owner: "u2",
                text: "keep",
            })
            .await
            .unwrap();

        let outcome = notes.delete(&n.uid, "u1").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Denied);
        assert!(notes.get_by_id(&n.uid).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_by_owner_removes_record() {
        let notes = records();
        let n = notes
            .create(&NewNote {
                owner: "u1",
                text: "gone",
            })
            .await
            .unwrap();

        assert_eq!(
            notes.delete(&n.uid, "u1").await.unwrap(),
            DeleteOutcome::Deleted
        );
        assert!(notes.get_by_id(&n.uid).await.is_err());
    }

    #[tokio::test]
    async fn test_update_by_other_owner_is_denied() {
        let notes = records();
        let n = notes
            .create(&NewNote {
                owner: "u2",
                text: "original",
            })
            .await
            .unwrap();

        let hijack = Note {
            uid: n.uid.clone(),
            owner: "u1".to_string(),
            text: "changed".to_string(),
        };
        assert_eq!(
            notes.update(&hijack, "u1").await.unwrap(),
            UpdateOutcome::Denied
        );
        assert_eq!(notes.get_by_id(&n.uid).await.unwrap().text, "original");
    }

    #[tokio::test]
    async fn test_update_by_owner_overwrites_record() {
        let notes = records();
        let mut n = notes
            .create(&NewNote {
                owner: "u1",
                text: "original",
            })
            .await
            .unwrap();

        n.text = "changed".to_string();
        assert_eq!(
            notes.update(&n, "u1").await.unwrap(),
            UpdateOutcome::Updated
        );
        assert_eq!(notes.get_by_id(&n.uid).await.unwrap().text, "changed");
    }
}
