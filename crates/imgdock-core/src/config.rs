//! Configuration module
//!
//! Environment-driven settings for the HTTP server, the storage gateway and
//! request limits. `.env` files are honoured through `dotenvy`.

use std::env;

use crate::storage_types::{BucketKind, StorageBackend};

const SERVER_PORT: u16 = 4000;
const MAX_FILE_SIZE_MB: usize = 25;
const MAX_BATCH_IMAGES: usize = 20;
const LISTING_PAGE_SIZE: usize = 100;
const UPLOAD_CACHE_CONTROL: &str = "max-age=31536000";

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub log_format: String,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_server_bucket: Option<String>,
    pub s3_storage_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub aws_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, R2, ...)
    pub cdn_host: Option<String>,
    pub storage_cdn_host: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Request limits
    pub max_file_size_bytes: usize,
    pub max_batch_images: usize,
    pub upload_cache_control: String,
    pub listing_page_size: usize,
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = match optional_var("STORAGE_BACKEND") {
            Some(value) => Some(value.parse::<StorageBackend>()?),
            None => None,
        };

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .unwrap_or(SERVER_PORT),
            environment,
            cors_origins,
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
            storage_backend,
            s3_server_bucket: optional_var("S3_SERVER_BUCKET"),
            s3_storage_bucket: optional_var("S3_STORAGE_BUCKET"),
            s3_region: optional_var("S3_REGION"),
            aws_region: optional_var("AWS_REGION"),
            s3_endpoint: optional_var("S3_ENDPOINT"),
            cdn_host: optional_var("CDN_HOST"),
            storage_cdn_host: optional_var("STORAGE_CDN_HOST"),
            local_storage_path: optional_var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: optional_var("LOCAL_STORAGE_BASE_URL"),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_batch_images: env::var("MAX_BATCH_IMAGES")
                .unwrap_or_else(|_| MAX_BATCH_IMAGES.to_string())
                .parse()
                .unwrap_or(MAX_BATCH_IMAGES),
            upload_cache_control: env::var("UPLOAD_CACHE_CONTROL")
                .unwrap_or_else(|_| UPLOAD_CACHE_CONTROL.to_string()),
            listing_page_size: env::var("LISTING_PAGE_SIZE")
                .unwrap_or_else(|_| LISTING_PAGE_SIZE.to_string())
                .parse()
                .unwrap_or(LISTING_PAGE_SIZE),
        };

        Ok(config)
    }

    /// Configuration for a local-filesystem backend with default limits.
    /// Used by tests and local tooling that do not read the environment.
    pub fn local(path: impl Into<String>, base_url: impl Into<String>) -> Self {
        Config {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            log_format: "compact".to_string(),
            storage_backend: Some(StorageBackend::Local),
            s3_server_bucket: None,
            s3_storage_bucket: None,
            s3_region: None,
            aws_region: None,
            s3_endpoint: None,
            cdn_host: None,
            storage_cdn_host: None,
            local_storage_path: Some(path.into()),
            local_storage_base_url: Some(base_url.into()),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            max_batch_images: MAX_BATCH_IMAGES,
            upload_cache_control: UPLOAD_CACHE_CONTROL.to_string(),
            listing_page_size: LISTING_PAGE_SIZE,
        }
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend.unwrap_or(StorageBackend::S3)
    }

    /// Region for the S3 backend, `S3_REGION` first then `AWS_REGION`
    pub fn region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }

    pub fn s3_bucket(&self, kind: BucketKind) -> Option<&str> {
        match kind {
            BucketKind::Server => self.s3_server_bucket.as_deref(),
            BucketKind::Storage => self.s3_storage_bucket.as_deref(),
        }
    }

    pub fn cdn_host(&self, kind: BucketKind) -> Option<&str> {
        match kind {
            BucketKind::Server => self.cdn_host.as_deref(),
            BucketKind::Storage => self.storage_cdn_host.as_deref(),
        }
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.max_batch_images == 0 {
            return Err(anyhow::anyhow!("MAX_BATCH_IMAGES must be greater than 0"));
        }

        if self.listing_page_size == 0 {
            return Err(anyhow::anyhow!("LISTING_PAGE_SIZE must be greater than 0"));
        }

        match self.storage_backend() {
            StorageBackend::S3 => {
                if self.s3_server_bucket.is_none() || self.s3_storage_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_SERVER_BUCKET and S3_STORAGE_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.region().is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
