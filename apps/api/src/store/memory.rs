use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{generate_id, Collection, DocumentStore, StoreError};

/// In-process document store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: RwLock<HashMap<Collection, HashMap<String, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(collection: Collection, id: &str) -> StoreError {
        StoreError::NotFound {
            collection,
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: Collection, doc: Value) -> Result<String, StoreError> {
        let id = generate_id();
        self.docs
            .write()
            .await
            .entry(collection)
            .or_default()
            .insert(id.clone(), doc);
        Ok(id)
    }

    async fn set_field(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        let doc = docs
            .get_mut(&collection)
            .and_then(|c| c.get_mut(id))
            .ok_or_else(|| Self::not_found(collection, id))?;

        match doc.as_object_mut() {
            Some(map) => {
                map.insert(field.to_string(), value);
            }
            None => {
                let mut map = serde_json::Map::new();
                map.insert(field.to_string(), value);
                *doc = Value::Object(map);
            }
        }
        Ok(())
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .docs
            .read()
            .await
            .get(&collection)
            .and_then(|c| c.get(id))
            .cloned())
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError> {
        let docs = self.docs.read().await;
        let Some(coll) = docs.get(&collection) else {
            return Ok(Vec::new());
        };
        Ok(coll
            .values()
            .filter(|doc| doc.get(field).and_then(Value::as_str) == Some(value))
            .cloned()
            .collect())
    }

    async fn replace(
        &self,
        collection: Collection,
        id: &str,
        doc: Value,
    ) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        let slot = docs
            .get_mut(&collection)
            .and_then(|c| c.get_mut(id))
            .ok_or_else(|| Self::not_found(collection, id))?;
        *slot = doc;
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        if let Some(coll) = self.docs.write().await.get_mut(&collection) {
            coll.remove(id);
        }
        Ok(())
    }
}
