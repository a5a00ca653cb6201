//! Store error types
//!
//! Error codes:
//! - STUDENTDB_STORE_URL_MISSING
//! - STUDENTDB_STORE_URL_INVALID
//! - STUDENTDB_STORE_INVALID_ID
//! - STUDENTDB_STORE_UNAVAILABLE
//! - STUDENTDB_STORE_CLOSED
//! - STUDENTDB_STORE_IO_ERROR
//! - STUDENTDB_STORE_CORRUPTED
//! - STUDENTDB_STORE_SERIALIZATION

use std::io;
use std::path::Path;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by the document store or its client
#[derive(Debug, Error)]
pub enum StoreError {
    /// No connection string was configured
    #[error("Store connection string is not set")]
    MissingConnectionString,

    /// Connection string has an unsupported scheme or is malformed
    #[error("Invalid store connection string '{0}': expected memory:// or file://<path>")]
    InvalidConnectionString(String),

    /// Identifier is not a well-formed document id
    #[error("Cast to ObjectId failed for value \"{0}\" at path \"_id\"")]
    InvalidId(String),

    /// Client never connected
    #[error("Store is not connected: {0}")]
    Unavailable(String),

    /// Client was closed during shutdown
    #[error("Store client is closed")]
    Closed,

    #[error("Store I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Snapshot file failed its integrity checks
    #[error("Store snapshot '{path}' is corrupted: {reason}")]
    Corrupted { path: String, reason: String },

    #[error("Store serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Creates an I/O error tagged with the file it concerns
    pub fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Creates a corruption error for a snapshot file
    pub fn corrupted(path: &Path, reason: impl Into<String>) -> Self {
        StoreError::Corrupted {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::MissingConnectionString => "STUDENTDB_STORE_URL_MISSING",
            StoreError::InvalidConnectionString(_) => "STUDENTDB_STORE_URL_INVALID",
            StoreError::InvalidId(_) => "STUDENTDB_STORE_INVALID_ID",
            StoreError::Unavailable(_) => "STUDENTDB_STORE_UNAVAILABLE",
            StoreError::Closed => "STUDENTDB_STORE_CLOSED",
            StoreError::Io { .. } => "STUDENTDB_STORE_IO_ERROR",
            StoreError::Corrupted { .. } => "STUDENTDB_STORE_CORRUPTED",
            StoreError::Serialization(_) => "STUDENTDB_STORE_SERIALIZATION",
        }
    }

    /// Whether the error prevents a client from being constructed at all
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            StoreError::MissingConnectionString
                | StoreError::InvalidConnectionString(_)
                | StoreError::Corrupted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(StoreError::Closed.code(), "STUDENTDB_STORE_CLOSED");
        assert_eq!(
            StoreError::InvalidId("x".into()).code(),
            "STUDENTDB_STORE_INVALID_ID"
        );
        assert_eq!(
            StoreError::MissingConnectionString.code(),
            "STUDENTDB_STORE_URL_MISSING"
        );
    }

    #[test]
    fn test_invalid_id_message() {
        let err = StoreError::InvalidId("abc".into());
        assert_eq!(
            err.to_string(),
            "Cast to ObjectId failed for value \"abc\" at path \"_id\""
        );
    }

    #[test]
    fn test_io_error_names_path() {
        let err = StoreError::io(
            Path::new("/tmp/students.json"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let display = err.to_string();
        assert!(display.contains("/tmp/students.json"));
        assert!(display.contains("denied"));
        assert!(!err.is_connection_error());
    }
}
