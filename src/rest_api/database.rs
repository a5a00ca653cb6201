//! # Student Facade
//!
//! Bridges HTTP handlers and the document store. Validates candidates before
//! every write and passes store failures through unchanged.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::schema;
use crate::storage::{Document, DocumentId, DocumentStore};

use super::errors::RestResult;

/// Create/read/update/delete operations on the student collection
#[derive(Clone)]
pub struct StudentFacade {
    store: Arc<dyn DocumentStore>,
}

impl StudentFacade {
    /// Creates a facade over an already connected store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Returns every stored student, as stored.
    ///
    /// Documents are not re-validated.
    pub async fn list(&self) -> RestResult<Vec<Document>> {
        Ok(self.store.find_all().await?)
    }

    /// Validates `candidate` and stores it under a new identifier
    pub async fn create(&self, candidate: &Map<String, Value>) -> RestResult<Document> {
        let student = schema::validate(candidate)?;
        let document = self.store.insert(student.into_fields()).await?;
        debug!(id = %document.id, "student created");
        Ok(document)
    }

    /// Validates `candidate` and replaces the student with `id` wholesale.
    ///
    /// Fields omitted from `candidate` are not carried over from the prior
    /// version. Returns the prior version, or `None` if no student has `id`.
    pub async fn update_by_id(
        &self,
        id: &str,
        candidate: &Map<String, Value>,
    ) -> RestResult<Option<Document>> {
        let student = schema::validate(candidate)?;
        let id: DocumentId = id.parse()?;
        let prior = self
            .store
            .find_by_id_and_replace(&id, student.into_fields())
            .await?;
        debug!(%id, matched = prior.is_some(), "student updated");
        Ok(prior)
    }

    /// Removes the student with `id`, returning it, or `None` if absent
    pub async fn delete_by_id(&self, id: &str) -> RestResult<Option<Document>> {
        let id: DocumentId = id.parse()?;
        let removed = self.store.find_by_id_and_delete(&id).await?;
        debug!(%id, matched = removed.is_some(), "student deleted");
        Ok(removed)
    }
}
