//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all storage backends must implement.

use crate::{BucketKind, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object metadata returned by a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub size_bytes: u64,
    pub last_modified: DateTime<Utc>,
}

/// A key the backend refused to delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyError {
    pub key: String,
    pub message: String,
}

/// Per-key result of a bulk delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted: Vec<String>,
    pub errors: Vec<KeyError>,
}

impl DeleteOutcome {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// Handlers receive it as `Arc<dyn ObjectStorage>` so tests can substitute
/// their own implementation.
///
/// No call is retried: a failure is returned to the caller as-is.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` under `key` and return its public URL
    async fn put(
        &self,
        bucket: BucketKind,
        key: &str,
        data: Bytes,
        content_type: &str,
        cache_control: Option<&str>,
    ) -> StorageResult<String>;

    /// List every object whose key starts with `prefix`
    async fn list(&self, bucket: BucketKind, prefix: &str) -> StorageResult<Vec<StoredObject>>;

    /// Delete a single object. Deleting a missing key succeeds.
    async fn delete(&self, bucket: BucketKind, key: &str) -> StorageResult<()>;

    /// Delete several objects concurrently.
    ///
    /// Per-key failures are collected in `errors` rather than raised; the
    /// returned lists keep the order of `keys`.
    async fn delete_many(&self, bucket: BucketKind, keys: &[String]) -> StorageResult<DeleteOutcome> {
        let results =
            futures::future::join_all(keys.iter().map(|key| self.delete(bucket, key))).await;

        let mut outcome = DeleteOutcome::default();
        for (key, result) in keys.iter().zip(results) {
            match result {
                Ok(()) => outcome.deleted.push(key.clone()),
                Err(e) => outcome.errors.push(KeyError {
                    key: key.clone(),
                    message: e.to_string(),
                }),
            }
        }

        Ok(outcome)
    }

    /// Publicly reachable URL for an object key
    fn public_url(&self, bucket: BucketKind, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
