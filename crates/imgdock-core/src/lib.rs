//! imgdock Core Library
//!
//! This crate provides error types, configuration and the request/response
//! models shared by the storage, processing and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::{BucketKind, StorageBackend};
