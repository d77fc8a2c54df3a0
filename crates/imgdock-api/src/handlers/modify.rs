use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::multipart::{FormData, FormValue};
use axum::{
    extract::{Multipart, State},
    Json,
};
use imgdock_core::models::{ModificationRequest, PreviewArtifact};
use imgdock_core::AppError;
use imgdock_processing::{package_preview, transform_batch, BatchItem, OutputSpec};
use std::sync::Arc;

/// Parse the `modification{N}` part paired with `image{N}`
fn parse_modification(form: &FormData, index: usize) -> Result<OutputSpec, AppError> {
    let field = format!("modification{}", index);
    let raw = form.text(&field).ok_or_else(|| {
        AppError::InvalidInput(format!("Missing {} for image{}", field, index))
    })?;

    let request: ModificationRequest = serde_json::from_str(raw)
        .map_err(|e| AppError::InvalidInput(format!("{}: {}", field, e)))?;

    OutputSpec::try_from(request).map_err(|e| AppError::InvalidInput(format!("{}: {}", field, e)))
}

/// Transform a batch of images and return inline previews
///
/// Each `image{N}` file is paired with the `modification{N}` JSON part. The
/// whole batch fails if any image fails; the error names the failing field.
#[utoipa::path(
    post,
    path = "/api/modify",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "`image{N}` files with matching `modification{N}` JSON parts (ModificationRequest)"),
    responses(
        (status = 200, description = "Previews in image index order", body = Vec<PreviewArtifact>),
        (status = 400, description = "Missing or invalid modification", body = ErrorResponse),
        (status = 413, description = "Too many images or body too large", body = ErrorResponse),
        (status = 500, description = "Image could not be decoded or encoded", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "modify_images"))]
pub async fn modify_images(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Vec<PreviewArtifact>>, HttpAppError> {
    let form = FormData::read(multipart).await?;

    let images = form.indexed("image");
    if images.is_empty() {
        return Err(AppError::InvalidInput("No images provided".to_string()).into());
    }
    if images.len() > state.config.max_batch_images {
        return Err(AppError::PayloadTooLarge(format!(
            "{} images in one request (max {})",
            images.len(),
            state.config.max_batch_images
        ))
        .into());
    }

    let mut items = Vec::with_capacity(images.len());
    for (index, value) in images {
        let FormValue::File(file) = value else {
            return Err(AppError::InvalidInput(format!("image{} is not a file", index)).into());
        };

        let mut spec = parse_modification(&form, index)?;
        if spec.title.is_empty() {
            spec.title = file
                .file_name
                .clone()
                .unwrap_or_else(|| format!("image{}", index));
        }

        items.push(BatchItem {
            index,
            source: file.to_source(),
            spec,
        });
    }

    let titles: Vec<String> = items.iter().map(|item| item.spec.title.clone()).collect();
    tracing::debug!(count = items.len(), "Transforming batch");

    let results = tokio::task::spawn_blocking(move || transform_batch(&items))
        .await
        .map_err(|e| AppError::Internal(format!("Transform task failed: {}", e)))??;

    let previews = titles
        .iter()
        .zip(results.iter())
        .map(|(title, result)| package_preview(title, result))
        .collect();

    Ok(Json(previews))
}
