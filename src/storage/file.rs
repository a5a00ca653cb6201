//! File-backed document store
//!
//! Snapshot layout (two lines):
//!
//! ```text
//! {"format":1,"count":<n>,"checksum":<crc32 of line 2>}
//! [<document>, ...]
//! ```
//!
//! - The whole collection is rewritten on every write
//! - Writes go to `<path>.tmp`, are fsynced, then renamed over `<path>`
//! - The checksum is verified on open; a mismatch refuses to open
//! - A missing file opens as an empty collection

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::checksum::{compute_checksum, verify_checksum};
use super::document::{Collection, Document, DocumentId};
use super::errors::{StoreError, StoreResult};
use super::DocumentStore;

const SNAPSHOT_FORMAT: u32 = 1;

/// First line of a snapshot file
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotHeader {
    format: u32,
    count: usize,
    checksum: u32,
}

/// Document store persisted to a single snapshot file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    collection: Mutex<Collection>,
}

impl FileStore {
    /// Opens the snapshot at `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is malformed, or fails its checksum.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let collection = match fs::read(&path).await {
            Ok(bytes) => Collection::from_documents(decode_snapshot(&path, &bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collection::new(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        info!(
            path = %path.display(),
            documents = collection.len(),
            "opened file store"
        );

        Ok(Self {
            path,
            collection: Mutex::new(collection),
        })
    }

    async fn mutate<T>(&self, change: impl FnOnce(&mut Collection) -> T) -> StoreResult<T> {
        let mut guard = self.collection.lock().await;
        self.commit(&mut guard, change).await
    }

    /// Like `mutate`, but writes nothing when no document has `id`
    async fn mutate_existing<T>(
        &self,
        id: &DocumentId,
        change: impl FnOnce(&mut Collection) -> Option<T>,
    ) -> StoreResult<Option<T>> {
        let mut guard = self.collection.lock().await;
        if !guard.contains(id) {
            return Ok(None);
        }
        self.commit(&mut guard, change).await
    }

    /// Applies `change` to a copy of `current`, persists it, then commits.
    ///
    /// `current` is left untouched if persisting fails.
    async fn commit<T>(
        &self,
        current: &mut Collection,
        change: impl FnOnce(&mut Collection) -> T,
    ) -> StoreResult<T> {
        let mut next = current.clone();
        let out = change(&mut next);
        self.persist(&next).await?;
        *current = next;
        Ok(out)
    }

    async fn persist(&self, collection: &Collection) -> StoreResult<()> {
        let bytes = encode_snapshot(collection.documents())?;
        let tmp = tmp_path(&self.path);

        let mut file = fs::File::create(&tmp)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        file.sync_all().await.map_err(|e| StoreError::io(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        debug!(
            path = %self.path.display(),
            documents = collection.len(),
            "persisted snapshot"
        );
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn find_all(&self) -> StoreResult<Vec<Document>> {
        Ok(self.collection.lock().await.documents().to_vec())
    }

    async fn insert(&self, fields: Map<String, Value>) -> StoreResult<Document> {
        self.mutate(|c| c.insert(fields)).await
    }

    async fn find_by_id_and_replace(
        &self,
        id: &DocumentId,
        fields: Map<String, Value>,
    ) -> StoreResult<Option<Document>> {
        self.mutate_existing(id, |c| c.replace(id, fields)).await
    }

    async fn find_by_id_and_delete(&self, id: &DocumentId) -> StoreResult<Option<Document>> {
        self.mutate_existing(id, |c| c.remove(id)).await
    }

    async fn close(&self) -> StoreResult<()> {
        let guard = self.collection.lock().await;
        info!(
            path = %self.path.display(),
            documents = guard.len(),
            "closed file store"
        );
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn encode_snapshot(documents: &[Document]) -> StoreResult<Vec<u8>> {
    let payload = serde_json::to_vec(documents)?;
    let header = SnapshotHeader {
        format: SNAPSHOT_FORMAT,
        count: documents.len(),
        checksum: compute_checksum(&payload),
    };

    let mut bytes = serde_json::to_vec(&header)?;
    bytes.push(b'\n');
    bytes.extend_from_slice(&payload);
    bytes.push(b'\n');
    Ok(bytes)
}

fn decode_snapshot(path: &Path, bytes: &[u8]) -> StoreResult<Vec<Document>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let split = bytes
        .iter()
        .position(|b| *b == b'\n')
        .ok_or_else(|| StoreError::corrupted(path, "missing snapshot header"))?;
    let (header_line, rest) = bytes.split_at(split);
    let payload = rest[1..].trim_ascii_end();

    let header: SnapshotHeader = serde_json::from_slice(header_line)
        .map_err(|e| StoreError::corrupted(path, format!("invalid header: {}", e)))?;

    if header.format != SNAPSHOT_FORMAT {
        return Err(StoreError::corrupted(
            path,
            format!("unsupported snapshot format {}", header.format),
        ));
    }
    if !verify_checksum(payload, header.checksum) {
        return Err(StoreError::corrupted(path, "checksum mismatch"));
    }

    let documents: Vec<Document> = serde_json::from_slice(payload)
        .map_err(|e| StoreError::corrupted(path, format!("invalid documents: {}", e)))?;

    if documents.len() != header.count {
        return Err(StoreError::corrupted(
            path,
            format!(
                "header declares {} documents, found {}",
                header.count,
                documents.len()
            ),
        ));
    }

    Ok(documents)
}
