//! Storage wrappers for failure-path tests.

use async_trait::async_trait;
use bytes::Bytes;
use imgdock_core::{BucketKind, StorageBackend};
use imgdock_storage::{LocalStorage, ObjectStorage, StorageError, StorageResult, StoredObject};

/// Local storage that fails deletes for keys containing a marker
pub struct FailingDeletes {
    inner: LocalStorage,
    marker: String,
}

impl FailingDeletes {
    pub fn new(inner: LocalStorage, marker: &str) -> Self {
        FailingDeletes {
            inner,
            marker: marker.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStorage for FailingDeletes {
    async fn put(
        &self,
        bucket: BucketKind,
        key: &str,
        data: Bytes,
        content_type: &str,
        cache_control: Option<&str>,
    ) -> StorageResult<String> {
        self.inner
            .put(bucket, key, data, content_type, cache_control)
            .await
    }

    async fn list(&self, bucket: BucketKind, prefix: &str) -> StorageResult<Vec<StoredObject>> {
        self.inner.list(bucket, prefix).await
    }

    async fn delete(&self, bucket: BucketKind, key: &str) -> StorageResult<()> {
        if key.contains(&self.marker) {
            return Err(StorageError::DeleteFailed("AccessDenied".to_string()));
        }
        self.inner.delete(bucket, key).await
    }

    fn public_url(&self, bucket: BucketKind, key: &str) -> String {
        self.inner.public_url(bucket, key)
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
