//! In-process document store

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::document::{Collection, Document, DocumentId};
use super::errors::StoreResult;
use super::DocumentStore;

/// Document store held entirely in memory; contents are lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: RwLock<Collection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing documents, bypassing validation
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            collection: RwLock::new(Collection::from_documents(documents)),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_all(&self) -> StoreResult<Vec<Document>> {
        Ok(self.collection.read().await.documents().to_vec())
    }

    async fn insert(&self, fields: Map<String, Value>) -> StoreResult<Document> {
        Ok(self.collection.write().await.insert(fields))
    }

    async fn find_by_id_and_replace(
        &self,
        id: &DocumentId,
        fields: Map<String, Value>,
    ) -> StoreResult<Option<Document>> {
        Ok(self.collection.write().await.replace(id, fields))
    }

    async fn find_by_id_and_delete(&self, id: &DocumentId) -> StoreResult<Option<Document>> {
        Ok(self.collection.write().await.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_then_find_all() {
        let store = MemoryStore::new();
        let doc = store.insert(fields(json!({"firstName": "Ravi"}))).await.unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all, vec![doc]);
    }

    #[tokio::test]
    async fn test_delete_twice_is_absent() {
        let store = MemoryStore::new();
        let doc = store.insert(Map::new()).await.unwrap();

        assert!(store.find_by_id_and_delete(&doc.id).await.unwrap().is_some());
        assert!(store.find_by_id_and_delete(&doc.id).await.unwrap().is_none());
        assert!(store.find_by_id_and_delete(&doc.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seeded_documents_returned_as_is() {
        let legacy = Document::new(DocumentId::generate(), fields(json!({"age": 99})));
        let store = MemoryStore::with_documents(vec![legacy.clone()]);
        assert_eq!(store.find_all().await.unwrap(), vec![legacy]);
    }
}
