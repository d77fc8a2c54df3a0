use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage_types::BucketKind;

/// Per-image metadata for bulk uploads (`metadata{N}` part)
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    #[serde(default)]
    pub title: String,
    /// Format name of the image. The stored content type follows the bytes
    /// and only falls back to this when they are not recognised.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub bucket: Option<BucketKind>,
    #[serde(default)]
    pub folder: String,
}

/// One uploaded object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    /// Object key the image was stored under
    pub image_name: String,
    pub image_url: String,
}
