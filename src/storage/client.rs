//! Store client: connection string parsing and client lifecycle
//!
//! Supported connection strings:
//! - `memory://` - in-process store
//! - `file://<path>` - snapshot file at `<path>`
//!
//! The client is opened once at startup, shared for the life of the
//! process, and closed on shutdown. A client that failed to connect still
//! exists and answers every operation with `Unavailable`.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{info, warn};

use super::document::{Document, DocumentId};
use super::errors::{StoreError, StoreResult};
use super::file::FileStore;
use super::memory::MemoryStore;
use super::DocumentStore;

const MEMORY_SCHEME: &str = "memory://";
const FILE_SCHEME: &str = "file://";

/// Parsed store connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionString {
    Memory,
    File(PathBuf),
}

impl ConnectionString {
    /// Parses a connection string.
    ///
    /// # Errors
    ///
    /// `InvalidConnectionString` for unknown schemes or an empty file path.
    pub fn parse(url: &str) -> StoreResult<Self> {
        let url = url.trim();

        if let Some(rest) = url.strip_prefix(MEMORY_SCHEME) {
            if rest.is_empty() {
                return Ok(ConnectionString::Memory);
            }
        } else if let Some(path) = url.strip_prefix(FILE_SCHEME) {
            if !path.is_empty() {
                return Ok(ConnectionString::File(PathBuf::from(path)));
            }
        }

        Err(StoreError::InvalidConnectionString(url.to_string()))
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionString::Memory => write!(f, "{}", MEMORY_SCHEME),
            ConnectionString::File(path) => write!(f, "{}{}", FILE_SCHEME, path.display()),
        }
    }
}

enum Backend {
    Memory(MemoryStore),
    File(FileStore),
    /// Connection failed; holds the reason
    Disconnected(String),
}

/// Handle to the document store shared by every request
pub struct StoreClient {
    backend: Backend,
    closed: AtomicBool,
}

impl StoreClient {
    /// Connects to the store named by `url`.
    ///
    /// # Errors
    ///
    /// - `MissingConnectionString` if `url` is `None`
    /// - `InvalidConnectionString` if it cannot be parsed
    /// - any error raised while opening a file store
    pub async fn connect(url: Option<&str>) -> StoreResult<Self> {
        let url = url.ok_or(StoreError::MissingConnectionString)?;
        let connection = ConnectionString::parse(url)?;
        Self::connect_to(&connection).await
    }

    /// Connects to an already parsed connection string
    pub async fn connect_to(connection: &ConnectionString) -> StoreResult<Self> {
        let backend = match connection {
            ConnectionString::Memory => Backend::Memory(MemoryStore::new()),
            ConnectionString::File(path) => Backend::File(FileStore::open(path.clone()).await?),
        };

        info!(store = %connection, "store connected");
        Ok(Self::from_backend(backend))
    }

    /// Wraps an existing in-memory store
    pub fn memory(store: MemoryStore) -> Self {
        Self::from_backend(Backend::Memory(store))
    }

    /// Creates a client that fails every operation with `Unavailable`
    pub fn disconnected(reason: impl Into<String>) -> Self {
        Self::from_backend(Backend::Disconnected(reason.into()))
    }

    fn from_backend(backend: Backend) -> Self {
        Self {
            backend,
            closed: AtomicBool::new(false),
        }
    }

    /// Whether the client holds a live backend and has not been closed
    pub fn is_connected(&self) -> bool {
        !matches!(self.backend, Backend::Disconnected(_)) && !self.is_closed()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Short name of the backend, for logs
    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory(_) => "memory",
            Backend::File(_) => "file",
            Backend::Disconnected(_) => "disconnected",
        }
    }

    fn store(&self) -> StoreResult<&dyn DocumentStore> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        match &self.backend {
            Backend::Memory(store) => Ok(store as &dyn DocumentStore),
            Backend::File(store) => Ok(store as &dyn DocumentStore),
            Backend::Disconnected(reason) => Err(StoreError::Unavailable(reason.clone())),
        }
    }
}

impl fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreClient")
            .field("backend", &self.backend_name())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[async_trait]
impl DocumentStore for StoreClient {
    async fn find_all(&self) -> StoreResult<Vec<Document>> {
        self.store()?.find_all().await
    }

    async fn insert(&self, fields: Map<String, Value>) -> StoreResult<Document> {
        self.store()?.insert(fields).await
    }

    async fn find_by_id_and_replace(
        &self,
        id: &DocumentId,
        fields: Map<String, Value>,
    ) -> StoreResult<Option<Document>> {
        self.store()?.find_by_id_and_replace(id, fields).await
    }

    async fn find_by_id_and_delete(&self, id: &DocumentId) -> StoreResult<Option<Document>> {
        self.store()?.find_by_id_and_delete(id).await
    }

    /// Closes the backend. Closing twice is a no-op.
    async fn close(&self) -> StoreResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let result = match &self.backend {
            Backend::Memory(store) => store.close().await,
            Backend::File(store) => store.close().await,
            Backend::Disconnected(_) => Ok(()),
        };

        match &result {
            Ok(()) => info!(backend = self.backend_name(), "store closed"),
            Err(e) => warn!(backend = self.backend_name(), error = %e, "store close failed"),
        }
        result
    }
}
