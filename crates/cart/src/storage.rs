//! The persistent key-value boundary.
//!
//! The cart treats durable storage as an opaque asynchronous string store:
//! a single `get`/`set` pair keyed by namespace strings, where both
//! operations may be slow or fail. Two backends ship with the crate: an
//! in-memory map for tests and a JSON-file store for on-device use.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a [`KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure (corrupt store file, encoding error, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Asynchronous durable string store.
///
/// The cart uses exactly one key and treats every failure as recoverable:
/// a failed `get` means cold start, a failed `set` is logged and dropped.
/// No retries are issued at this boundary.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// In-memory backend.
///
/// The reference implementation of the boundary; durability ends with the
/// process. Used by tests and useful as a null backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Single-file JSON backend.
///
/// Keeps the whole key-value map as one JSON object on disk, the on-device
/// analogue of a mobile key-value storage facility. Writes go to a sibling
/// temporary file and are renamed into place so a crash mid-write leaves
/// the previous file intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by the file at `path`.
    ///
    /// The file is created on first `set`; a missing file reads as empty.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_map(&self) -> Result<HashMap<String, String>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                serde_json::from_str(&raw).map_err(|e| StorageError::Backend(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut map = self.read_map().await?;
        map.insert(key.to_owned(), value);
        let raw =
            serde_json::to_string(&map).map_err(|e| StorageError::Backend(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
