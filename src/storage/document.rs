//! Stored documents and the in-memory collection shared by every engine
//!
//! A document is a JSON object plus a store-assigned `_id`. The collection
//! keeps documents in insertion order, which is the store's natural order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::errors::StoreError;

/// Name of the identifier key in serialized documents
pub const ID_FIELD: &str = "_id";

/// Store-assigned document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(DocumentId)
            .map_err(|_| StoreError::InvalidId(s.to_string()))
    }
}

/// A persisted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    /// Every other field, stored as written
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Builds a document, discarding any caller-supplied `_id`
    pub fn new(id: DocumentId, mut fields: Map<String, Value>) -> Self {
        fields.remove(ID_FIELD);
        Self { id, fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Ordered document collection
#[derive(Debug, Clone, Default)]
pub struct Collection {
    documents: Vec<Document>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.documents.iter().any(|d| d.id == *id)
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Appends a document under a freshly generated identifier
    pub fn insert(&mut self, fields: Map<String, Value>) -> Document {
        let document = Document::new(DocumentId::generate(), fields);
        self.documents.push(document.clone());
        document
    }

    /// Replaces the body of the document with `id`, returning the prior version
    ///
    /// The identifier and position are kept. Returns `None` when no document
    /// matches.
    pub fn replace(&mut self, id: &DocumentId, fields: Map<String, Value>) -> Option<Document> {
        let slot = self.documents.iter_mut().find(|d| d.id == *id)?;
        let replacement = Document::new(*id, fields);
        Some(std::mem::replace(slot, replacement))
    }

    /// Removes and returns the document with `id`
    pub fn remove(&mut self, id: &DocumentId) -> Option<Document> {
        let index = self.documents.iter().position(|d| d.id == *id)?;
        Some(self.documents.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_document_id_parse() {
        let id = DocumentId::generate();
        let parsed: DocumentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);

        let err = "not-an-id".parse::<DocumentId>().unwrap_err();
        assert_eq!(err.code(), "STUDENTDB_STORE_INVALID_ID");
    }

    #[test]
    fn test_document_serializes_id_inline() {
        let doc = Document::new(DocumentId::generate(), fields(json!({"firstName": "Ravi"})));
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["_id"], json!(doc.id.to_string()));
        assert_eq!(value["firstName"], "Ravi");

        let back: Document = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_caller_id_is_discarded() {
        let mut coll = Collection::new();
        let doc = coll.insert(fields(json!({"_id": "mine", "age": 20})));
        assert!(doc.get("_id").is_none());
        assert_ne!(doc.id.to_string(), "mine");
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut coll = Collection::new();
        let a = coll.insert(fields(json!({"n": 1})));
        let b = coll.insert(fields(json!({"n": 2})));
        let c = coll.insert(fields(json!({"n": 3})));
        coll.remove(&b.id);

        let ids: Vec<DocumentId> = coll.documents().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[test]
    fn test_replace_returns_prior_and_keeps_position() {
        let mut coll = Collection::new();
        let a = coll.insert(fields(json!({"n": 1, "extra": true})));
        coll.insert(fields(json!({"n": 2})));

        let prior = coll.replace(&a.id, fields(json!({"n": 10}))).unwrap();
        assert_eq!(prior.get("n"), Some(&json!(1)));

        let first = &coll.documents()[0];
        assert_eq!(first.id, a.id);
        assert_eq!(first.get("n"), Some(&json!(10)));
        assert!(first.get("extra").is_none());
    }

    #[test]
    fn test_missing_id_is_none() {
        let mut coll = Collection::new();
        let ghost = DocumentId::generate();
        assert!(coll.replace(&ghost, Map::new()).is_none());
        assert!(coll.remove(&ghost).is_none());
        assert!(coll.is_empty());

        let doc = coll.insert(Map::new());
        assert!(coll.contains(&doc.id));
        assert!(!coll.contains(&ghost));
    }
}
