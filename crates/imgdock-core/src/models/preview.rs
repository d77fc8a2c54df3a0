use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Preview of a transformed image returned by the modify endpoint.
///
/// `previewUrl` is a base64 data URL the client can display directly and send
/// back to the upload endpoint unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewArtifact {
    pub title: String,
    /// Title with its extension replaced by the output format's extension
    pub file_name: String,
    pub preview_url: String,
    /// Payload size in KiB, fractional
    pub size_kb: f64,
    /// Short format name (`webp`, `jpeg`, ...); absent for unrecognised raw uploads
    pub format: Option<String>,
    pub width: u32,
    pub height: u32,
    /// `width / height`, null when the height is zero
    pub aspect_ratio: Option<f64>,
    pub raw: bool,
}
