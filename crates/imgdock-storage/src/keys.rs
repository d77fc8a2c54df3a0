//! Shared key generation for uploads.
//!
//! Key format: `{bucket prefix}{folder}/{title}` where the prefix is
//! `assets/` for the server bucket and `images/assets/` for the storage bucket.

use crate::traits::{StorageError, StorageResult};
use crate::BucketKind;

/// Which fields an upload must supply to build its key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Single free-form upload: only the title is required
    NameOnly,
    /// Bulk upload: both folder and title are required
    FolderAndName,
}

fn segments(value: &str) -> impl Iterator<Item = &str> {
    value.split('/').map(str::trim).filter(|s| !s.is_empty())
}

/// Build the object key for an upload.
///
/// Empty segments are dropped, so doubled or surrounding slashes in `folder`
/// and `title` collapse. `..` segments are rejected.
pub fn resolve_upload_key(
    bucket: BucketKind,
    folder: &str,
    title: &str,
    policy: KeyPolicy,
) -> StorageResult<String> {
    let title_parts: Vec<&str> = segments(title).collect();
    if title_parts.is_empty() {
        return Err(StorageError::InvalidKey("Image title is required".to_string()));
    }

    let folder_parts: Vec<&str> = segments(folder).collect();
    if policy == KeyPolicy::FolderAndName && folder_parts.is_empty() {
        return Err(StorageError::InvalidKey("Folder is required".to_string()));
    }

    if folder_parts
        .iter()
        .chain(title_parts.iter())
        .any(|s| *s == "..")
    {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }

    let mut key = bucket.prefix().to_string();
    key.push_str(
        &folder_parts
            .into_iter()
            .chain(title_parts)
            .collect::<Vec<_>>()
            .join("/"),
    );

    Ok(key)
}
