use crate::traits::{ObjectStorage, StorageError, StorageResult, StoredObject};
use crate::{BucketKind, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Each bucket kind gets its own directory under `base_path`
/// (`{base_path}/server`, `{base_path}/storage`).
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/imgdock")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:4000/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        for kind in [BucketKind::Server, BucketKind::Storage] {
            let dir = base_path.join(kind.as_str());
            fs::create_dir_all(&dir).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    fn bucket_root(&self, bucket: BucketKind) -> PathBuf {
        self.base_path.join(bucket.as_str())
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys that contain path traversal sequences or would resolve
    /// outside the bucket directory.
    fn key_to_path(&self, bucket: BucketKind, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.starts_with('/') || storage_key.split('/').any(|segment| segment == "..") {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let root = self.bucket_root(bucket);
        let path = root.join(storage_key);

        let root_canonical = root.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&root_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    /// Generate public URL for file
    fn generate_url(&self, bucket: BucketKind, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            bucket.as_str(),
            key
        )
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Collect every regular file below `root` as (key, metadata) pairs
    async fn walk(root: &Path) -> StorageResult<Vec<(String, std::fs::Metadata)>> {
        let mut files = Vec::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let meta = entry.metadata().await?;
                if meta.is_dir() {
                    pending.push(path);
                } else if meta.is_file() {
                    let relative = path.strip_prefix(root).map_err(|e| {
                        StorageError::BackendError(format!(
                            "Unexpected path {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                    let key = relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect::<Vec<_>>()
                        .join("/");
                    files.push((key, meta));
                }
            }
        }

        Ok(files)
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put(
        &self,
        bucket: BucketKind,
        key: &str,
        data: Bytes,
        content_type: &str,
        _cache_control: Option<&str>,
    ) -> StorageResult<String> {
        let path = self.key_to_path(bucket, key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            bucket = %bucket,
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(self.generate_url(bucket, key))
    }

    async fn list(&self, bucket: BucketKind, prefix: &str) -> StorageResult<Vec<StoredObject>> {
        let root = self.bucket_root(bucket);
        let start = std::time::Instant::now();

        let files = Self::walk(&root).await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %bucket,
                prefix = %prefix,
                "Local storage list failed"
            );
            StorageError::ListFailed(e.to_string())
        })?;

        let mut objects: Vec<StoredObject> = files
            .into_iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, meta)| StoredObject {
                key,
                size_bytes: meta.len(),
                last_modified: meta
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now()),
            })
            .collect();
        // Match S3's lexicographic listing order
        objects.sort_by(|a, b| a.key.cmp(&b.key));

        tracing::info!(
            bucket = %bucket,
            prefix = %prefix,
            count = objects.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage list successful"
        );

        Ok(objects)
    }

    async fn delete(&self, bucket: BucketKind, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(bucket, key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            bucket = %bucket,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    fn public_url(&self, bucket: BucketKind, key: &str) -> String {
        self.generate_url(bucket, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
