//! Document store subsystem
//!
//! Holds the student collection as schemaless JSON documents. The store
//! never validates: documents are returned exactly as they were written.
//!
//! # Design Principles
//!
//! - Store-assigned identifiers, immutable after insert
//! - Insertion order is the natural order
//! - Unknown identifiers on replace/delete are `None`, not errors
//! - Snapshot files are checksummed on every write

mod checksum;
mod client;
mod document;
mod errors;
mod file;
mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};

pub use checksum::compute_checksum;
pub use client::{ConnectionString, StoreClient};
pub use document::{Collection, Document, DocumentId, ID_FIELD};
pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Operations every store engine provides
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns every document in natural order
    async fn find_all(&self) -> StoreResult<Vec<Document>>;

    /// Persists `fields` under a new identifier and returns the stored document
    async fn insert(&self, fields: Map<String, Value>) -> StoreResult<Document>;

    /// Replaces the body of the document with `id`, returning the prior version
    async fn find_by_id_and_replace(
        &self,
        id: &DocumentId,
        fields: Map<String, Value>,
    ) -> StoreResult<Option<Document>>;

    /// Removes the document with `id`, returning it
    async fn find_by_id_and_delete(&self, id: &DocumentId) -> StoreResult<Option<Document>>;

    /// Releases the engine's resources
    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}
