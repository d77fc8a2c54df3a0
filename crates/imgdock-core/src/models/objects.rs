use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::storage_types::BucketKind;

/// One stored object as presented to the listing UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListedObject {
    pub url: String,
    pub key: String,
    /// Size in KiB with two decimals, e.g. `"12.34"`
    #[serde(rename = "sizeInKB")]
    pub size_in_kb: String,
    /// `DD. MM. YYYY HH:MM` in UTC
    #[serde(rename = "lastModified")]
    pub last_modified: String,
    #[serde(skip)]
    pub size_bytes: u64,
    #[serde(skip)]
    pub last_modified_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Response for `GET /api/objects`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectListResponse {
    pub message: String,
    pub objects: Vec<ListedObject>,
    pub folders: Vec<String>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

/// Request body for `DELETE /api/delete-objects`
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DeleteObjectsRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "No keys provided"))]
    pub keys: Vec<String>,
    #[serde(default, rename = "type")]
    pub bucket: Option<BucketKind>,
}

/// A key that could not be deleted and the backend's reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteFailure {
    pub key: String,
    pub message: String,
}

/// Response for `DELETE /api/delete-objects`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteObjectsResponse {
    pub message: String,
    pub deleted: Vec<String>,
    pub errors: Vec<DeleteFailure>,
}
