//! imgdock Storage Library
//!
//! This crate provides the storage gateway used to upload, list and delete
//! image objects, with implementations for S3 (and S3-compatible providers)
//! and the local filesystem.
//!
//! # Key format
//!
//! Objects live in one of two logical buckets, each with a fixed prefix:
//!
//! - **server**: `assets/{folder}/{title}`
//! - **storage**: `images/assets/{folder}/{title}`
//!
//! Keys must not contain `..` segments or a leading `/`. Key generation is
//! centralized in the `keys` module so uploads and listings stay consistent.

pub mod factory;
pub mod keys;
pub mod listing;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use imgdock_core::{BucketKind, StorageBackend};
pub use keys::{resolve_upload_key, KeyPolicy};
pub use listing::{ListingPage, ListingQuery, SortColumn, SortOrder};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{DeleteOutcome, KeyError, ObjectStorage, StorageError, StorageResult, StoredObject};
