use crate::traits::{ObjectStorage, StorageError, StorageResult, StoredObject};
use crate::{BucketKind, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectMeta, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};

/// Settings for one logical bucket
#[derive(Debug, Clone)]
pub struct S3BucketConfig {
    pub bucket: String,
    /// CDN host serving this bucket (e.g. "d1234.cloudfront.net")
    pub cdn_host: Option<String>,
}

#[derive(Clone)]
struct BucketStore {
    store: AmazonS3,
    bucket: String,
    cdn_host: Option<String>,
}

/// S3 storage implementation
///
/// Holds one `AmazonS3` store per bucket kind so server assets and archived
/// originals can live in different buckets.
#[derive(Clone)]
pub struct S3Storage {
    server: BucketStore,
    storage: BucketStore,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `server` / `storage` - bucket settings for each bucket kind
    pub async fn new(
        region: String,
        endpoint_url: Option<String>,
        server: S3BucketConfig,
        storage: S3BucketConfig,
    ) -> StorageResult<Self> {
        let server = Self::build_store(&region, endpoint_url.as_deref(), server)?;
        let storage = Self::build_store(&region, endpoint_url.as_deref(), storage)?;

        Ok(S3Storage {
            server,
            storage,
            region,
            endpoint_url,
        })
    }

    fn build_store(
        region: &str,
        endpoint_url: Option<&str>,
        config: S3BucketConfig,
    ) -> StorageResult<BucketStore> {
        // Build AmazonS3 object store from environment and explicit settings.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(config.bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(BucketStore {
            store,
            bucket: config.bucket,
            cdn_host: config.cdn_host,
        })
    }

    fn bucket(&self, kind: BucketKind) -> &BucketStore {
        match kind {
            BucketKind::Server => &self.server,
            BucketKind::Storage => &self.storage,
        }
    }

    /// Generate public URL for S3 object
    ///
    /// A configured CDN host wins. Otherwise S3-compatible providers use
    /// path-style `{endpoint}/{bucket}/{key}` and AWS uses the virtual-hosted
    /// `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
    fn generate_url(&self, kind: BucketKind, key: &str) -> String {
        let target = self.bucket(kind);
        if let Some(ref host) = target.cdn_host {
            let host = host.trim_end_matches('/');
            if host.starts_with("http://") || host.starts_with("https://") {
                format!("{}/{}", host, key)
            } else {
                format!("https://{}/{}", host, key)
            }
        } else if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, target.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                target.bucket, self.region, key
            )
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(
        &self,
        bucket: BucketKind,
        key: &str,
        data: Bytes,
        content_type: &str,
        cache_control: Option<&str>,
    ) -> StorageResult<String> {
        let target = self.bucket(bucket);
        let size = data.len() as u64;
        let location = Path::from(key.to_string());

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        if let Some(cache_control) = cache_control {
            attributes.insert(Attribute::CacheControl, cache_control.to_string().into());
        }
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = target
            .store
            .put_opts(&location, PutPayload::from(data), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %target.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %target.bucket,
            key = %key,
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(self.generate_url(bucket, key))
    }

    async fn list(&self, bucket: BucketKind, prefix: &str) -> StorageResult<Vec<StoredObject>> {
        let target = self.bucket(bucket);
        let start = std::time::Instant::now();
        let prefix_path = Path::from(prefix.to_string());

        let result: ObjectResult<Vec<ObjectMeta>> =
            target.store.list(Some(&prefix_path)).try_collect().await;

        let metas = result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %target.bucket,
                prefix = %prefix,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 list failed"
            );
            StorageError::ListFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %target.bucket,
            prefix = %prefix,
            count = metas.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 list successful"
        );

        Ok(metas
            .into_iter()
            .map(|meta| StoredObject {
                key: meta.location.to_string(),
                size_bytes: meta.size,
                last_modified: meta.last_modified,
            })
            .collect())
    }

    async fn delete(&self, bucket: BucketKind, key: &str) -> StorageResult<()> {
        let target = self.bucket(bucket);
        let start = std::time::Instant::now();
        let location = Path::from(key.to_string());

        let result: ObjectResult<_> = target.store.delete(&location).await;

        match result {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %target.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            bucket = %target.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    fn public_url(&self, bucket: BucketKind, key: &str) -> String {
        self.generate_url(bucket, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
