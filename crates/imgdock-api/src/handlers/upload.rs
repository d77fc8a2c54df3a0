use crate::constants::DEFAULT_UPLOAD_FOLDER;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::multipart::FormData;
use axum::{
    extract::{Multipart, State},
    Json,
};
use imgdock_core::models::{UploadMetadata, UploadedImage};
use imgdock_core::{AppError, BucketKind};
use imgdock_processing::{probe, OutputFormat, SourceImage};
use imgdock_storage::{resolve_upload_key, KeyPolicy};
use std::str::FromStr;
use std::sync::Arc;

const OCTET_STREAM: &str = "application/octet-stream";

/// One object ready to be stored
struct PendingUpload {
    bucket: BucketKind,
    key: String,
    source: SourceImage,
    /// `format` from the metadata part
    format_hint: Option<OutputFormat>,
}

/// Content type follows the bytes. For unrecognised bytes the metadata
/// format wins over the declared part type.
fn content_type_of(source: &SourceImage, format_hint: Option<OutputFormat>) -> String {
    probe(&source.data, source.declared_mime.as_deref())
        .ok()
        .and_then(|meta| meta.format.output_format())
        .or(format_hint)
        .map(|format| format.mime_type().to_string())
        .or_else(|| source.declared_mime.clone())
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}

/// A format name (`webp`) or MIME type (`image/webp`); anything else is ignored
fn parse_format_hint(value: &str) -> Option<OutputFormat> {
    OutputFormat::parse(value)
        .ok()
        .or_else(|| OutputFormat::from_mime_type(value.trim()))
}

fn parse_bucket(value: Option<&str>) -> Result<BucketKind, AppError> {
    value
        .map(BucketKind::from_str)
        .transpose()
        .map(Option::unwrap_or_default)
        .map_err(|e| AppError::InvalidInput(e.to_string()))
}

/// `image{N}` + `metadata{N}` pairs. Images without metadata are skipped.
fn bulk_uploads(form: &FormData) -> Result<Vec<PendingUpload>, HttpAppError> {
    let mut pending = Vec::new();

    for (index, value) in form.indexed("image") {
        let Some(raw) = form.text(&format!("metadata{}", index)) else {
            tracing::warn!(index, "Skipping image without metadata");
            continue;
        };
        let metadata: UploadMetadata = serde_json::from_str(raw)
            .map_err(|e| AppError::InvalidInput(format!("metadata{}: {}", index, e)))?;

        let format_hint = metadata.format.as_deref().and_then(parse_format_hint);

        let bucket = metadata.bucket.unwrap_or_default();
        let key = resolve_upload_key(
            bucket,
            &metadata.folder,
            &metadata.title,
            KeyPolicy::FolderAndName,
        )?;

        pending.push(PendingUpload {
            bucket,
            key,
            source: value.to_source()?,
            format_hint,
        });
    }

    Ok(pending)
}

/// The single free-form upload: `image` + `imageName`
fn single_upload(form: &FormData) -> Result<Option<PendingUpload>, HttpAppError> {
    let (Some(value), Some(name)) = (form.get("image"), form.text("imageName")) else {
        return Ok(None);
    };

    let bucket = parse_bucket(form.text("bucket"))?;
    let folder = form.text("folder").unwrap_or(DEFAULT_UPLOAD_FOLDER);
    let key = resolve_upload_key(bucket, folder, name, KeyPolicy::NameOnly)?;

    Ok(Some(PendingUpload {
        bucket,
        key,
        source: value.to_source()?,
        format_hint: None,
    }))
}

/// Upload images to object storage
///
/// Accepts either the bulk form (`image{N}` as a file or a base64 data URL,
/// plus `metadata{N}` JSON) or the single form (`image` + `imageName`, with
/// optional `bucket` and `folder`).
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "objects",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "`image{N}` + `metadata{N}` (UploadMetadata) pairs, or `image` + `imageName`"),
    responses(
        (status = 200, description = "Stored objects in form order", body = Vec<UploadedImage>),
        (status = 400, description = "No valid image/metadata pairs or invalid key", body = ErrorResponse),
        (status = 413, description = "Too many images or body too large", body = ErrorResponse),
        (status = 500, description = "Storage gateway failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_images"))]
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Vec<UploadedImage>>, HttpAppError> {
    let form = FormData::read(multipart).await?;

    let mut pending = bulk_uploads(&form)?;
    if pending.is_empty() {
        pending.extend(single_upload(&form)?);
    }

    if pending.is_empty() {
        return Err(AppError::InvalidInput("No valid images provided".to_string()).into());
    }
    if pending.len() > state.config.max_batch_images {
        return Err(AppError::PayloadTooLarge(format!(
            "{} images in one request (max {})",
            pending.len(),
            state.config.max_batch_images
        ))
        .into());
    }

    let cache_control = state.config.upload_cache_control.as_str();
    let uploads = pending.into_iter().map(|upload| {
        let storage = state.storage.clone();
        async move {
            let content_type = content_type_of(&upload.source, upload.format_hint);
            let url = storage
                .put(
                    upload.bucket,
                    &upload.key,
                    upload.source.data,
                    &content_type,
                    Some(cache_control),
                )
                .await?;

            Ok::<_, HttpAppError>(UploadedImage {
                image_name: upload.key,
                image_url: url,
            })
        }
    });

    let uploaded = futures::future::try_join_all(uploads).await?;
    tracing::info!(count = uploaded.len(), "Images uploaded");

    Ok(Json(uploaded))
}
